//! Infrastructure layer
//!
//! This module contains external integrations and adapters.

mod config;
mod credentials;
mod logging;
pub mod server;
pub mod yaml;

pub use config::{Config, DEFAULT_CONFIG_FILE, ENV_CREDENTIALS, ENV_LOG, ENV_SERVER};
pub use credentials::Credentials;
pub use logging::init_logging;
pub use server::{BambooServer, DryRunPublisher, PlanPublisher, publish};
pub use yaml::YamlBackend;
