pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{create_app, AppState};
pub use config::AppConfig;
pub use crate::core::action::{ActionOutcome, RegisterAction};
pub use utils::error::{AuthBackendError, RegisterError, Result};
