//! Custom public cloud images

use crate::provider::ProviderClient;
use crate::utils::adapt::{
    adapt_nullable_sdk_model_to_resource_object, adapt_nullable_string, adapt_nullable_time,
    adapt_string_list, object_type,
};
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{call, configure_client, require_client};
use crate::validators::validate_custom_image_instance;
use leaseweb_framework::planmodifier::{requires_replace, use_state_for_unknown};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::string_length_between;
use leaseweb_framework::{
    AttrType, Attribute, Attributes, ConfigureRequest, Context, CreateRequest, CreateResponse,
    DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse,
    MetadataRequest, ModifyPlanRequest, ModifyPlanResponse, ReadRequest, ReadResponse, Resource,
    Schema, UpdateRequest, UpdateResponse, Value, async_trait, import_state_passthrough_id,
};
use leaseweb_sdk::models::publiccloud::{CreateImageOpts, Image, StorageSize, UpdateImageOpts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StorageSizeModel {
    pub size: Value<f64>,
    pub unit: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ImageModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub instance_id: Value<String>,
    pub custom: Value<bool>,
    pub state: Value<String>,
    pub market_apps: Value<Vec<String>>,
    pub storage_types: Value<Vec<String>>,
    pub flavour: Value<String>,
    pub region: Value<String>,
    pub created_at: Value<String>,
    pub updated_at: Value<String>,
    pub storage_size: Value<StorageSizeModel>,
}

fn storage_size_attributes() -> Attributes {
    attributes([
        ("size", Attribute::float64().computed()),
        ("unit", Attribute::string().computed()),
    ])
}

fn adapt_storage_size(size: &StorageSize) -> StorageSizeModel {
    StorageSizeModel {
        size: Value::Known(size.size),
        unit: Value::string(&size.unit),
    }
}

/// Project an image. The API does not report the source instance, so
/// `instance_id` is passed in from the plan or prior state.
pub(crate) fn adapt_image(
    image: &Image,
    instance_id: Value<String>,
    diags: &mut Diagnostics,
) -> ImageModel {
    ImageModel {
        id: Value::string(&image.id),
        name: Value::string(&image.name),
        instance_id,
        custom: Value::Known(image.custom),
        state: Value::from_option(image.state.map(|s| s.to_string())),
        market_apps: Value::Known(image.market_apps.clone()),
        storage_types: adapt_string_list(&image.storage_types),
        flavour: Value::string(&image.flavour),
        region: adapt_nullable_string(image.get_region_ok()),
        created_at: adapt_nullable_time(image.created_at.as_ref()),
        updated_at: adapt_nullable_time(image.updated_at.as_ref()),
        storage_size: adapt_nullable_sdk_model_to_resource_object(
            image.storage_size.as_ref(),
            &object_type(storage_size_attributes()),
            adapt_storage_size,
            diags,
        ),
    }
}

pub(crate) fn image_attributes() -> Attributes {
    attributes([
        (
            "id",
            Attribute::string()
                .computed()
                .description("The image unique identifier")
                .plan_modifier(use_state_for_unknown()),
        ),
        (
            "name",
            Attribute::string()
                .required()
                .validator(string_length_between(1, 255)),
        ),
        (
            "instance_id",
            Attribute::string()
                .required()
                .description("The stopped instance to create the image from")
                .plan_modifier(requires_replace()),
        ),
        ("custom", Attribute::bool().computed()),
        ("state", Attribute::string().computed()),
        ("market_apps", Attribute::list(AttrType::String).computed()),
        (
            "storage_types",
            Attribute::list(AttrType::String).computed(),
        ),
        ("flavour", Attribute::string().computed()),
        ("region", Attribute::string().computed()),
        ("created_at", Attribute::string().computed()),
        ("updated_at", Attribute::string().computed()),
        (
            "storage_size",
            Attribute::single_nested(storage_size_attributes()).computed(),
        ),
    ])
}

/// `leaseweb_publiccloud_image`
#[derive(Default)]
pub struct ImageResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for ImageResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_image")
    }

    fn schema(&self) -> Schema {
        Schema::new(image_attributes()).with_description("Manages a custom public cloud image")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    async fn create(&self, ctx: &Context, req: CreateRequest, resp: &mut CreateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req.plan.get::<ImageModel>(&mut resp.diagnostics) else {
            return;
        };
        let opts = CreateImageOpts {
            name: plan.name.value_or_default(),
            instance_id: plan.instance_id.value_or_default(),
        };

        info!(instance_id = %opts.instance_id, "Creating custom image");
        let api = client.client.public_cloud();
        match call(ctx, api.create_image(opts).execute()).await {
            Ok((image, _)) => {
                let state = adapt_image(&image, plan.instance_id, &mut resp.diagnostics);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                "Error creating public cloud image",
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req.state.get::<ImageModel>(&mut resp.diagnostics) else {
            return;
        };
        let id = prior.id.as_str();

        // No detail endpoint; look the image up in the list.
        let images = match paginate(ctx, client.client.public_cloud().get_image_list()).await {
            Ok(images) => images,
            Err(e) => {
                report_error(
                    "Unable to read public cloud images",
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        match images.iter().find(|image| image.id == id) {
            Some(image) => {
                let state = adapt_image(image, prior.instance_id.clone(), &mut resp.diagnostics);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            None => {
                warn!(
                    id,
                    "Public cloud image no longer exists, removing from state"
                );
                resp.state.remove();
            }
        }
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let (Some(plan), Some(state)) = (
            req.plan.get::<ImageModel>(&mut resp.diagnostics),
            req.state.get::<ImageModel>(&mut resp.diagnostics),
        ) else {
            return;
        };
        let id = state.id.as_str();
        let opts = UpdateImageOpts {
            name: plan.name.value_or_default(),
        };

        info!(id, "Renaming custom image");
        let api = client.client.public_cloud();
        match call(ctx, api.update_image(id, opts).execute()).await {
            Ok((image, _)) => {
                let new_state = adapt_image(&image, plan.instance_id, &mut resp.diagnostics);
                resp.state.set(&new_state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!("Unable to update image {}", id),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn delete(&self, _ctx: &Context, req: DeleteRequest, _resp: &mut DeleteResponse) {
        warn!(
            id = %req.state.raw()["id"],
            "Custom images cannot be deleted through the API, removing from state only"
        );
    }

    async fn import_state(
        &self,
        _ctx: &Context,
        req: ImportStateRequest,
        resp: &mut ImportStateResponse,
    ) {
        import_state_passthrough_id("id", &req.id, resp);
    }

    async fn modify_plan(
        &self,
        ctx: &Context,
        req: ModifyPlanRequest,
        resp: &mut ModifyPlanResponse,
    ) {
        if req.plan.is_null() || !req.state.is_null() {
            return;
        }
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req.plan.get::<ImageModel>(&mut resp.diagnostics) else {
            return;
        };
        validate_custom_image_instance(ctx, client, &plan.instance_id, &mut resp.diagnostics)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;

    fn image_body(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "web base",
            "custom": true,
            "state": "READY",
            "marketApps": [],
            "storageTypes": ["CENTRAL"],
            "flavour": "ubuntu",
            "region": "eu-west-3",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": null,
            "storageSize": {"size": 4.5, "unit": "GB"}
        })
    }

    #[test]
    fn test_adapt_image() {
        let image: Image = serde_json::from_value(image_body("img-1")).unwrap();
        let mut diags = Diagnostics::new();
        let model = adapt_image(&image, Value::string("i-1"), &mut diags);

        assert!(diags.is_empty());
        assert_eq!(model.instance_id, Value::string("i-1"));
        assert_eq!(
            model.created_at,
            Value::string("2024-03-01 10:00:00 +0000 UTC")
        );
        assert_eq!(model.updated_at, Value::Null);
        assert_eq!(
            model.storage_size.as_known().unwrap().unit,
            Value::string("GB")
        );

        let raw = serde_json::to_value(&model).unwrap();
        ImageResource::default().schema().check(&raw).unwrap();
    }

    #[tokio::test]
    async fn test_read_finds_image_in_list() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/publicCloud/v1/images",
            200,
            json!({
                "images": [image_body("img-1"), image_body("img-2")],
                "_metadata": {"limit": 50, "offset": 0, "totalCount": 2}
            }),
        );
        let mut resource = ImageResource::default();
        resource.client = Some(Arc::new(ProviderClient::new(Client::with_transport(mock))));

        let prior = ImageModel {
            id: Value::string("img-2"),
            instance_id: Value::string("i-1"),
            ..Default::default()
        };
        let mut state = leaseweb_framework::ResourceData::null();
        state.set(&prior, &mut Diagnostics::new());
        let mut resp = ReadResponse {
            state: state.clone(),
            diagnostics: Diagnostics::new(),
        };
        resource
            .read(&Context::new(), ReadRequest { state }, &mut resp)
            .await;

        assert!(resp.diagnostics.is_empty());
        assert_eq!(resp.state.raw()["id"], json!("img-2"));
        assert_eq!(resp.state.raw()["instance_id"], json!("i-1"));
    }

    #[tokio::test]
    async fn test_read_missing_image_removes_state() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/publicCloud/v1/images",
            200,
            json!({"images": [], "_metadata": {"limit": 50, "offset": 0, "totalCount": 0}}),
        );
        let mut resource = ImageResource::default();
        resource.client = Some(Arc::new(ProviderClient::new(Client::with_transport(mock))));

        let mut state = leaseweb_framework::ResourceData::null();
        state.set(
            &ImageModel {
                id: Value::string("img-9"),
                ..Default::default()
            },
            &mut Diagnostics::new(),
        );
        let mut resp = ReadResponse {
            state: state.clone(),
            diagnostics: Diagnostics::new(),
        };
        resource
            .read(&Context::new(), ReadRequest { state }, &mut resp)
            .await;
        assert!(resp.state.is_null());
    }
}
