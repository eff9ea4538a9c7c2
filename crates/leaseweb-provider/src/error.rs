//! Provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Config(#[from] leaseweb_config::ConfigError),

    #[error("API error: {0}")]
    Sdk(#[from] leaseweb_sdk::SdkError),

    #[error("Invalid value for {attribute}: {message}")]
    InvalidValue { attribute: String, message: String },
}

impl ProviderError {
    pub fn invalid_value(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::InvalidValue {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
