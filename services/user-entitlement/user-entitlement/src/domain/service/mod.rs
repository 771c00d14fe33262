pub mod permissions;
pub mod users;

pub use permissions::{ApplyOutcome, PermissionService};
pub use users::UserService;

#[cfg(test)]
mod service_test;
