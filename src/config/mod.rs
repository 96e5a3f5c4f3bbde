// src/config/mod.rs
pub mod news;

pub use news::{ConfigError, PipelineConfig, ENV_API_KEY, ENV_CONFIG_PATH};
