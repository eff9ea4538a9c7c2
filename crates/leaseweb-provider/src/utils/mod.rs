//! Helpers shared by resources and data sources

pub mod adapt;
pub mod errors;
pub mod fanout;
pub mod memo;
pub mod paginate;

use crate::provider::ProviderClient;
use leaseweb_framework::schema::AttributeKind;
use leaseweb_framework::{Attributes, ConfigureRequest, Context, Diagnostics, Interrupted};
use leaseweb_sdk::SdkError;
use std::future::Future;
use std::sync::Arc;

/// Map an interrupted context onto the SDK error the caller reports.
pub fn interrupted_error(reason: Interrupted) -> SdkError {
    match reason {
        Interrupted::Cancelled => SdkError::Cancelled,
        Interrupted::DeadlineExceeded => SdkError::Timeout,
    }
}

/// Run an SDK call under the operation context.
pub async fn call<T, F>(ctx: &Context, fut: F) -> Result<T, SdkError>
where
    F: Future<Output = Result<T, SdkError>>,
{
    match ctx.run(fut).await {
        Ok(result) => result,
        Err(reason) => Err(interrupted_error(reason)),
    }
}

/// Extract the shared client from provider data. `None` without a
/// diagnostic means the provider has not been configured yet.
pub fn configure_client(
    req: &ConfigureRequest,
    diags: &mut Diagnostics,
) -> Option<Arc<ProviderClient>> {
    let data = req.provider_data.clone()?;
    match data.downcast::<ProviderClient>() {
        Ok(client) => Some(client),
        Err(_) => {
            diags.add_error(
                "Unexpected Configure Type",
                "Expected provider data to be a Leaseweb client. Please report this issue to the provider developers.",
            );
            None
        }
    }
}

/// Borrow the configured client, or report that there is none.
pub fn require_client<'a>(
    client: &'a Option<Arc<ProviderClient>>,
    diags: &mut Diagnostics,
) -> Option<&'a ProviderClient> {
    if client.is_none() {
        diags.add_error(
            "Unconfigured Leaseweb Client",
            "The provider has not been configured. Configure the provider before using its resources.",
        );
    }
    client.as_deref()
}

/// The same attributes as computed-only, without validators or plan
/// modifiers. Data sources describe their results this way.
pub fn read_only(attributes: Attributes) -> Attributes {
    attributes
        .into_iter()
        .map(|(name, mut attribute)| {
            attribute.required = false;
            attribute.optional = false;
            attribute.computed = true;
            attribute.validators.clear();
            attribute.plan_modifiers.clear();
            attribute.kind = match attribute.kind {
                AttributeKind::SingleNested(nested) => {
                    AttributeKind::SingleNested(read_only(nested))
                }
                AttributeKind::ListNested(nested) => AttributeKind::ListNested(read_only(nested)),
                kind => kind,
            };
            (name, attribute)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_sdk::Client;
    use leaseweb_sdk::testing::MockTransport;
    use std::time::Duration;

    #[tokio::test]
    async fn test_call_maps_cancellation() {
        let ctx = Context::new();
        ctx.cancel();
        let result = call(&ctx, async { Ok::<_, SdkError>(1) }).await;
        assert!(matches!(result, Err(SdkError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_maps_deadline() {
        let ctx = Context::with_timeout(Duration::from_millis(10));
        let result = call(&ctx, async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, SdkError>(1)
        })
        .await;
        assert!(matches!(result, Err(SdkError::Timeout)));
    }

    #[test]
    fn test_configure_client() {
        let mut diags = Diagnostics::new();
        assert!(configure_client(&ConfigureRequest::default(), &mut diags).is_none());
        assert!(diags.is_empty());

        let client = ProviderClient::new(Client::with_transport(MockTransport::new()));
        let req = ConfigureRequest {
            provider_data: Some(Arc::new(client)),
        };
        assert!(configure_client(&req, &mut diags).is_some());

        let req = ConfigureRequest {
            provider_data: Some(Arc::new("not a client")),
        };
        assert!(configure_client(&req, &mut diags).is_none());
        assert!(diags.has_error());
    }

    #[test]
    fn test_read_only_attributes() {
        use leaseweb_framework::Attribute;
        use leaseweb_framework::schema::attributes;
        use leaseweb_framework::validator::one_of_strings;

        let attrs = read_only(attributes([
            ("region", Attribute::string().required()),
            (
                "contract",
                Attribute::single_nested(attributes([(
                    "type",
                    Attribute::string()
                        .required()
                        .validator(one_of_strings(&["HOURLY"])),
                )]))
                .required(),
            ),
        ]));

        assert!(attrs["region"].is_computed_only());
        let contract = &attrs["contract"];
        assert!(contract.is_computed_only());
        let nested = &contract.nested().unwrap()["type"];
        assert!(nested.is_computed_only());
        assert!(nested.validators.is_empty());
    }
}
