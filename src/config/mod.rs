//! Configuration loading

mod app_config;

pub use app_config::{
    AppConfig, BackendConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
};
