pub mod accesses;
pub mod conflicts;
pub mod groups;
pub mod resources;

pub use accesses::AccessService;
pub use conflicts::ConflictService;
pub use groups::GroupService;
pub use resources::ResourceService;

#[cfg(test)]
mod service_test;
