//! Instance types available in a region

use crate::provider::ProviderClient;
use crate::utils::adapt::adapt_string_list;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    AttrType, Attribute, Attributes, ConfigureRequest, Context, DataSource, Diagnostics,
    MetadataRequest, ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use leaseweb_sdk::models::publiccloud::InstanceType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    default,
    bound(deserialize = "T: serde::de::DeserializeOwned + Default")
)]
struct QuantityModel<T> {
    value: Value<T>,
    unit: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ResourcesModel {
    cpu: Value<QuantityModel<i32>>,
    memory: Value<QuantityModel<f64>>,
    public_network_speed: Value<QuantityModel<i32>>,
    private_network_speed: Value<QuantityModel<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct InstanceTypeModel {
    name: Value<String>,
    resources: Value<ResourcesModel>,
    storage_types: Value<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct InstanceTypesModel {
    region: Value<String>,
    instance_types: Value<Vec<InstanceTypeModel>>,
}

fn quantity(value: Attribute) -> Attribute {
    Attribute::single_nested(attributes([
        ("value", value.computed()),
        ("unit", Attribute::string().computed()),
    ]))
    .computed()
}

fn instance_type_attributes() -> Attributes {
    attributes([
        ("name", Attribute::string().computed()),
        (
            "resources",
            Attribute::single_nested(attributes([
                ("cpu", quantity(Attribute::int32())),
                ("memory", quantity(Attribute::float64())),
                ("public_network_speed", quantity(Attribute::int32())),
                ("private_network_speed", quantity(Attribute::int32())),
            ]))
            .computed(),
        ),
        (
            "storage_types",
            Attribute::list(AttrType::String).computed(),
        ),
    ])
}

fn adapt_instance_type(instance_type: &InstanceType) -> InstanceTypeModel {
    let resources = &instance_type.resources;
    let speed = |value: i32, unit: &str| {
        Value::Known(QuantityModel {
            value: Value::Known(value),
            unit: Value::string(unit),
        })
    };
    InstanceTypeModel {
        name: Value::string(&instance_type.name),
        resources: Value::Known(ResourcesModel {
            cpu: speed(resources.cpu.value, &resources.cpu.unit),
            memory: Value::Known(QuantityModel {
                value: Value::Known(resources.memory.value),
                unit: Value::string(&resources.memory.unit),
            }),
            public_network_speed: speed(
                resources.public_network_speed.value,
                &resources.public_network_speed.unit,
            ),
            private_network_speed: speed(
                resources.private_network_speed.value,
                &resources.private_network_speed.unit,
            ),
        }),
        storage_types: match &instance_type.storage_types {
            Some(types) => adapt_string_list(types),
            None => Value::Null,
        },
    }
}

/// `leaseweb_publiccloud_instance_types`
#[derive(Default)]
pub struct InstanceTypesDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for InstanceTypesDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_instance_types")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            ("region", Attribute::string().required()),
            (
                "instance_types",
                Attribute::list_nested(instance_type_attributes()).computed(),
            ),
        ]))
        .with_description("Lists the instance types available in a region")
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
        let Some(mut model) = req.config.get::<InstanceTypesModel>(&mut resp.diagnostics) else {
            return;
        };
        let region = model.region.as_str().to_string();

        let request = client.client.public_cloud().get_instance_type_list(&region);
        match paginate(ctx, request).await {
            Ok(types) => {
                model.instance_types =
                    Value::Known(types.iter().map(adapt_instance_type).collect());
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!("Unable to list instance types of region {}", region),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }
}
