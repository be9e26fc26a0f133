use thiserror::Error;

pub mod app_config;
pub mod catalog;
pub mod config;

pub use app_config::AppConfig;
pub use catalog::{
    NormalizedCategory, NormalizedImage, NormalizedProduct, ProductType, StockStatus,
};
pub use config::{load_app_config, load_app_config_from_env};

/// Errors raised while loading and validating the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
