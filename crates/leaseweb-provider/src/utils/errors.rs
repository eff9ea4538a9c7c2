//! Upstream errors to diagnostics
//!
//! Error bodies that decode as an `ErrorResponse` are logged with their
//! correlation id and reported with the upstream message. Per-field
//! `errorDetails` become attribute diagnostics.

use leaseweb_framework::{AttributePath, Diagnostics};
use leaseweb_sdk::SdkError;
use tracing::error;

/// Report an SDK error under `summary`.
pub fn report_error(summary: &str, err: &SdkError, diags: &mut Diagnostics) {
    let Some(response) = err.error_response() else {
        error!(error = %err, "{}", summary);
        diags.add_error(summary, err.to_string());
        return;
    };

    error!(
        correlation_id = response.correlation_id.as_deref().unwrap_or_default(),
        error_code = response.error_code.as_deref().unwrap_or_default(),
        error_message = response.get_error_message(),
        error_details = ?response.error_details,
        status = err.status().unwrap_or_default(),
        "{}",
        summary
    );

    if let Some(details) = response.get_error_details_ok() {
        let mut fields: Vec<&String> = details.keys().collect();
        fields.sort();
        for field in fields {
            diags.add_attribute_error(detail_path(field), summary, details[field].join(", "));
        }
    }

    let detail = match response.get_error_message() {
        "" => err.to_string(),
        message => message.to_string(),
    };
    diags.add_error(summary, detail);
}

/// `contract.billingFrequency` -> `contract.billing_frequency`
fn detail_path(field: &str) -> AttributePath {
    let mut parts = field.split('.').map(snake_case);
    let mut path = AttributePath::root(parts.next().unwrap_or_default());
    for part in parts {
        path = path.at_name(part);
    }
    path
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_message() {
        let err = SdkError::Api {
            status: 400,
            body: r#"{"correlationId":"c-1","errorCode":"400","errorMessage":"Validation failed","errorDetails":{"contract.billingFrequency":["must be one of 0, 1, 3, 6, 12"]}}"#.to_string(),
        };
        let mut diags = Diagnostics::new();
        report_error("Error creating public cloud instance", &err, &mut diags);

        assert_eq!(diags.len(), 2);
        let diags: Vec<_> = diags.into_iter().collect();
        assert_eq!(
            diags[0].attribute,
            Some(AttributePath::root("contract").at_name("billing_frequency"))
        );
        assert_eq!(diags[0].detail, "must be one of 0, 1, 3, 6, 12");
        assert_eq!(diags[1].summary, "Error creating public cloud instance");
        assert_eq!(diags[1].detail, "Validation failed");
        assert_eq!(diags[1].attribute, None);
    }

    #[test]
    fn test_non_json_body_falls_back_to_error_text() {
        let err = SdkError::Api {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        let mut diags = Diagnostics::new();
        report_error("Error reading DNS resource record set", &err, &mut diags);

        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.detail, "502 Bad Gateway");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("reverseLookup"), "reverse_lookup");
        assert_eq!(snake_case("ip"), "ip");
    }
}
