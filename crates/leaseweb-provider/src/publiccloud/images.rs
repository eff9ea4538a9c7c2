//! Public cloud images data source

use super::instance::{ImageModel, adapt_image, image_attributes};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, read_only, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ImagesModel {
    standard: Value<bool>,
    images: Value<Vec<ImageModel>>,
}

/// `leaseweb_publiccloud_images`
#[derive(Default)]
pub struct ImagesDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for ImagesDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_images")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "standard",
                Attribute::bool()
                    .optional()
                    .description("true for standard images only, false for custom images only"),
            ),
            (
                "images",
                Attribute::list_nested(read_only(image_attributes(Attribute::string()))).computed(),
            ),
        ]))
        .with_description("Lists the images instances can be launched with")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    async fn read(
        &self,
        ctx: &Context,
        req: ReadDataSourceRequest,
        resp: &mut ReadDataSourceResponse,
    ) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(mut model) = req.config.get::<ImagesModel>(&mut resp.diagnostics) else {
            return;
        };

        let mut request = client.client.public_cloud().get_image_list();
        if let Some(standard) = model.standard.as_known() {
            request = request.with_standard(*standard);
        }

        match paginate(ctx, request).await {
            Ok(images) => {
                model.images = Value::Known(images.iter().map(adapt_image).collect());
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                "Unable to list public cloud images",
                &e,
                &mut resp.diagnostics,
            ),
        }
    }
}
