//! Source instance of a custom image

use crate::provider::ProviderClient;
use crate::utils::call;
use crate::utils::errors::report_error;
use leaseweb_framework::{AttributePath, Context, Diagnostics, Value};
use leaseweb_sdk::models::publiccloud::InstanceState;

const MAX_ROOT_DISK_SIZE: i32 = 100;

/// The instance must exist, be stopped, have a root disk of at most 100 GB
/// and not run Windows.
pub async fn validate_custom_image_instance(
    ctx: &Context,
    client: &ProviderClient,
    instance_id: &Value<String>,
    diags: &mut Diagnostics,
) {
    let Some(instance_id) = instance_id.as_known() else {
        return;
    };
    let path = AttributePath::root("instance_id");

    let api = client.client.public_cloud();
    let instance = match call(ctx, api.get_instance(instance_id).execute()).await {
        Ok((instance, _)) => instance,
        Err(e) if e.is_not_found() => {
            diags.add_attribute_error(
                path,
                "Invalid Instance",
                format!("Instance {:?} does not exist.", instance_id),
            );
            return;
        }
        Err(e) => {
            report_error("Error reading public cloud instance", &e, diags);
            return;
        }
    };

    if instance.state != InstanceState::Stopped {
        diags.add_attribute_error(
            path.clone(),
            "Invalid Instance",
            format!(
                "Instance {:?} must be {:?} to create an image, got {:?}.",
                instance_id,
                InstanceState::Stopped.as_str(),
                instance.state.as_str()
            ),
        );
    }
    if instance.root_disk_size > MAX_ROOT_DISK_SIZE {
        diags.add_attribute_error(
            path.clone(),
            "Invalid Instance",
            format!(
                "Instance {:?} has a root disk of {} GB, images can be created from disks of at most {} GB.",
                instance_id, instance.root_disk_size, MAX_ROOT_DISK_SIZE
            ),
        );
    }
    if instance.image.flavour.eq_ignore_ascii_case("windows") {
        diags.add_attribute_error(
            path,
            "Invalid Instance",
            format!(
                "Instance {:?} runs Windows, which cannot be imaged.",
                instance_id
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;

    const PATH: &str = "/publicCloud/v1/instances/i-1";

    async fn validate(mock: std::sync::Arc<MockTransport>) -> Diagnostics {
        let client = ProviderClient::new(Client::with_transport(mock));
        let mut diags = Diagnostics::new();
        validate_custom_image_instance(&Context::new(), &client, &Value::string("i-1"), &mut diags)
            .await;
        diags
    }

    #[tokio::test]
    async fn test_stopped_linux_instance() {
        let mock = MockTransport::new();
        mock.on(Method::Get, PATH, 200, fixtures::instance("i-1", "STOPPED"));
        assert!(validate(mock).await.is_empty());
    }

    #[tokio::test]
    async fn test_running_windows_instance_with_large_disk() {
        let mut body = fixtures::instance("i-1", "RUNNING");
        body["rootDiskSize"] = json!(200);
        body["image"]["flavour"] = json!("windows");
        let mock = MockTransport::new();
        mock.on(Method::Get, PATH, 200, body);

        let diags = validate(mock).await;
        assert_eq!(diags.len(), 3);
        assert!(diags.iter().all(|d| d.attribute == Some(AttributePath::root("instance_id"))));
    }

    #[tokio::test]
    async fn test_missing_instance() {
        let diags = validate(MockTransport::new()).await;
        let diag = diags.iter().next().unwrap();
        assert!(diag.detail.contains("does not exist"));
    }
}
