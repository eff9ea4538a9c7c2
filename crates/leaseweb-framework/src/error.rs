//! Framework error types

use crate::diag::Diagnostic;
use crate::path::AttributePath;
use thiserror::Error;

/// Framework errors
#[derive(Error, Debug)]
pub enum FrameworkError {
    #[error("Value conversion failed at {path}: {message}")]
    Conversion {
        path: AttributePath,
        message: String,
    },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Unknown data source type: {0}")]
    UnknownDataSourceType(String),

    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Provider has not been configured")]
    NotConfigured,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameworkError {
    pub fn conversion(path: AttributePath, message: impl Into<String>) -> Self {
        FrameworkError::Conversion {
            path,
            message: message.into(),
        }
    }

    /// Render the error as a fatal diagnostic for the host.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FrameworkError::Conversion { path, message } => Diagnostic::attribute_error(
                path.clone(),
                "Value Conversion Error",
                message.clone(),
            ),
            FrameworkError::UnknownResourceType(name) => Diagnostic::error(
                "Unknown Resource Type",
                format!(
                    "The provider does not implement a resource named {:?}.",
                    name
                ),
            ),
            FrameworkError::UnknownDataSourceType(name) => Diagnostic::error(
                "Unknown Data Source Type",
                format!(
                    "The provider does not implement a data source named {:?}.",
                    name
                ),
            ),
            FrameworkError::DuplicateTypeName(name) => Diagnostic::error(
                "Duplicate Type Name",
                format!("The type name {:?} is registered more than once.", name),
            ),
            FrameworkError::NotConfigured => Diagnostic::error(
                "Unconfigured Provider",
                "The provider must be configured before resources or data sources are used.",
            ),
            FrameworkError::Json(e) => Diagnostic::error("Value Conversion Error", e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameworkError>;
