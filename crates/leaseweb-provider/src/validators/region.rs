//! Region membership

use super::quoted_list;
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use leaseweb_framework::{AttributePath, Context, Diagnostics, Value};

/// `region` must name an existing public cloud region.
pub async fn validate_region(
    ctx: &Context,
    client: &ProviderClient,
    region: &Value<String>,
    diags: &mut Diagnostics,
) {
    let Some(region) = region.as_known() else {
        return;
    };

    let regions = match client.regions(ctx).await {
        Ok(regions) => regions,
        Err(e) => {
            report_error("Error fetching public cloud regions", &e, diags);
            return;
        }
    };

    if !regions.iter().any(|r| r == region) {
        diags.add_attribute_error(
            AttributePath::root("region"),
            "Invalid Region",
            format!(
                "Attribute region value must be one of: {}, got: {:?}",
                quoted_list(&regions),
                region
            ),
        );
    }
}
