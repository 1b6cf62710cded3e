pub mod responses;
pub mod routes;

pub use routes::{create_app, AppState, REGISTER_PATH};
