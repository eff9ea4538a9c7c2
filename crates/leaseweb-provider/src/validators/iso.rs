//! ISO availability

use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use leaseweb_framework::{AttributePath, Context, Diagnostics, Value};

/// `desired_id` must be one of the ISOs the API offers.
pub async fn validate_iso(
    ctx: &Context,
    client: &ProviderClient,
    desired_id: &Value<String>,
    diags: &mut Diagnostics,
) {
    let Some(desired_id) = desired_id.as_known() else {
        return;
    };

    let isos = match paginate(ctx, client.client.public_cloud().get_iso_list()).await {
        Ok(isos) => isos,
        Err(e) => {
            report_error("Error fetching public cloud ISOs", &e, diags);
            return;
        }
    };

    if !isos.iter().any(|iso| &iso.id == desired_id) {
        let ids: Vec<String> = isos.into_iter().map(|iso| iso.id).collect();
        diags.add_attribute_error(
            AttributePath::root("desired_id"),
            "Invalid ISO",
            format!(
                "Attribute desired_id value must be one of: {}, got: {:?}",
                super::quoted_list(&ids),
                desired_id
            ),
        );
    }
}
