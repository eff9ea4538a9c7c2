//! Request and response DTOs
//!
//! Field names follow the upstream camelCase JSON. Fields the API may omit
//! or send as `null` are `Option`s; a few types carry
//! `get_x` / `get_x_ok` / `set_x` accessors for them.

pub mod dns;
pub mod ipmgmt;
pub mod publiccloud;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of an upstream error response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub correlation_id: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<HashMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn get_error_message(&self) -> &str {
        self.error_message.as_deref().unwrap_or_default()
    }

    pub fn get_error_details_ok(&self) -> Option<&HashMap<String, Vec<String>>> {
        self.error_details.as_ref()
    }
}
