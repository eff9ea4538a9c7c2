//! Whether an instance may be terminated

use leaseweb_framework::{AttributePath, Diagnostics, Value};
use leaseweb_sdk::models::publiccloud::InstanceState;

const BLOCKING_STATES: [InstanceState; 3] = [
    InstanceState::Creating,
    InstanceState::Destroying,
    InstanceState::Destroyed,
];

/// Instances that are being created or destroyed, or whose contract already
/// has an end date, cannot be terminated.
pub fn validate_instance_termination(
    state: &Value<String>,
    contract_ends_at: &Value<String>,
    diags: &mut Diagnostics,
) {
    if let Some(state) = state.as_known() {
        if BLOCKING_STATES.iter().any(|s| s.as_str() == state) {
            diags.add_attribute_error(
                AttributePath::root("state"),
                "Instance Cannot Be Terminated",
                format!(
                    "The instance cannot be terminated while its state is {:?}.",
                    state
                ),
            );
        }
    }

    if let Some(ends_at) = contract_ends_at.as_known() {
        diags.add_attribute_error(
            AttributePath::root("contract").at_name("ends_at"),
            "Instance Cannot Be Terminated",
            format!(
                "The instance cannot be terminated because its contract already ends at {:?}.",
                ends_at
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_instance_may_be_terminated() {
        let mut diags = Diagnostics::new();
        validate_instance_termination(&Value::string("RUNNING"), &Value::Null, &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_destroying_instance_is_blocked() {
        let mut diags = Diagnostics::new();
        validate_instance_termination(&Value::string("DESTROYING"), &Value::Null, &mut diags);
        let diag = diags.iter().next().unwrap();
        assert!(diag.detail.contains("\"DESTROYING\""));
        assert_eq!(diag.attribute, Some(AttributePath::root("state")));
    }

    #[test]
    fn test_contract_end_date_is_blocking() {
        let mut diags = Diagnostics::new();
        validate_instance_termination(
            &Value::string("RUNNING"),
            &Value::string("2025-01-01 00:00:00 +0000 UTC"),
            &mut diags,
        );
        let diag = diags.iter().next().unwrap();
        assert!(diag.detail.contains("2025-01-01 00:00:00 +0000 UTC"));
    }
}
