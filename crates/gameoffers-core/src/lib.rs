mod app_config;
mod config;
mod error;
mod lookup;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use lookup::Lookup;
