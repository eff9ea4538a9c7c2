//! Leaseweb SDK error types

use crate::models::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{} {}", .status, status_text(.status))]
    Api { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    Timeout,
}

fn status_text(status: &u16) -> &'static str {
    match *status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Error",
    }
}

impl SdkError {
    /// HTTP status of an upstream error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of an upstream error response.
    pub fn body(&self) -> Option<&str> {
        match self {
            SdkError::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Upstream error body decoded as an [`ErrorResponse`], when it is one.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        self.body()
            .and_then(|body| serde_json::from_str::<ErrorResponse>(body).ok())
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = SdkError::Api {
            status: 404,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_response_parsed_from_body() {
        let err = SdkError::Api {
            status: 400,
            body: r#"{"correlationId":"c-1","errorCode":"400","errorMessage":"Validation failed","errorDetails":{"ttl":["invalid"]}}"#.to_string(),
        };
        let parsed = err.error_response().unwrap();
        assert_eq!(parsed.correlation_id.as_deref(), Some("c-1"));
        assert_eq!(parsed.error_message.as_deref(), Some("Validation failed"));
        assert_eq!(
            parsed.error_details.unwrap()["ttl"],
            vec!["invalid".to_string()]
        );
    }

    #[test]
    fn test_non_json_body() {
        let err = SdkError::Api {
            status: 502,
            body: "<html>".to_string(),
        };
        assert!(err.error_response().is_none());
    }
}
