//! Contract type and term must agree

use leaseweb_framework::validator::ValidateRequest;
use leaseweb_framework::value::is_known;
use leaseweb_framework::{Diagnostics, Validator};
use leaseweb_sdk::models::publiccloud::ContractType;
use std::sync::Arc;

/// Monthly contracts need a term, hourly contracts must not have one.
pub struct ContractTermValidator;

pub fn contract_term() -> Arc<dyn Validator> {
    Arc::new(ContractTermValidator)
}

impl Validator for ContractTermValidator {
    fn description(&self) -> String {
        format!(
            "term must be 0 when type is {:?} and cannot be 0 when type is {:?}",
            ContractType::Hourly.as_str(),
            ContractType::Monthly.as_str()
        )
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let field = |name: &str| req.value.get(name).filter(|raw| is_known(raw));
        let (Some(contract_type), Some(term)) = (
            field("type").and_then(|raw| raw.as_str()),
            field("term").and_then(|raw| raw.as_i64()),
        ) else {
            return;
        };

        let path = req.path.at_name("term");
        if contract_type == ContractType::Monthly.as_str() && term == 0 {
            diags.add_attribute_error(
                path.clone(),
                "Invalid Contract Term",
                format!(
                    "Attribute {} cannot be 0 when contract.type is {:?}",
                    path, contract_type
                ),
            );
        } else if contract_type == ContractType::Hourly.as_str() && term != 0 {
            diags.add_attribute_error(
                path.clone(),
                "Invalid Contract Term",
                format!(
                    "Attribute {} must be 0 when contract.type is {:?}",
                    path, contract_type
                ),
            );
        }
    }
}
