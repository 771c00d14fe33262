pub mod error;
pub mod model;
pub mod ports;
pub mod repos;
pub mod service;
