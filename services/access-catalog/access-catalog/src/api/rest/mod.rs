mod error;
mod handlers;
mod routes;

pub use routes::{router, AppState};
