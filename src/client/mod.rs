mod client_impl;
mod config;
mod factory;

pub use client_impl::{DubbingClient, HealthStatus};
pub use config::{
    DubbingConfig, DubbingConfigBuilder, ModelConfig, RefinementStrategy, DEFAULT_BASE_URL,
    DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_TIMEOUT, DEFAULT_TRANSLATION_TEMPERATURE, DEFAULT_VOICE,
    TEMP_DIR_NAME,
};
pub use factory::DubbingClientBuilder;
