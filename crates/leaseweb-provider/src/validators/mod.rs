//! Cross-attribute and upstream-backed validators
//!
//! [`contract_term`] is a schema validator and runs at config validation.
//! The others need the API or prior state and are called from
//! `modify_plan` (or `delete`) of the resources they guard.

pub mod contract_term;
pub mod custom_image_instance;
pub mod instance_termination;
pub mod instance_type;
pub mod iso;
pub mod region;

pub use contract_term::contract_term;
pub use custom_image_instance::validate_custom_image_instance;
pub use instance_termination::validate_instance_termination;
pub use instance_type::validate_instance_type;
pub use iso::validate_iso;
pub use region::validate_region;

fn quoted_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", quoted.join(" "))
}
