//! Public cloud instances

use crate::error::{ProviderError, Result};
use crate::provider::ProviderClient;
use crate::utils::adapt::{
    adapt_nullable_sdk_model_to_resource_object, adapt_nullable_string, adapt_nullable_time,
    adapt_sdk_model_to_resource_object, adapt_sdk_models_to_list_value, adapt_string_list,
    object_type, optional_non_empty_string, optional_non_zero, optional_string,
};
use crate::utils::errors::report_error;
use crate::utils::{call, configure_client, require_client};
use crate::validators::{
    contract_term, validate_instance_termination, validate_instance_type, validate_region,
};
use leaseweb_framework::planmodifier::{
    requires_replace, requires_replace_if_configured, use_state_for_unknown,
};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::{
    int_between, one_of_ints, one_of_strings, string_length_between,
};
use leaseweb_framework::{
    Attribute, Attributes, ConfigureRequest, Context, CreateRequest, CreateResponse,
    DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse,
    MetadataRequest, ModifyPlanRequest, ModifyPlanResponse, ReadRequest, ReadResponse, Resource,
    Schema, UpdateRequest, UpdateResponse, Value, async_trait, import_state_passthrough_id,
};
use leaseweb_sdk::models::publiccloud::{
    BILLING_FREQUENCIES, CONTRACT_TERMS, Contract, ContractType, Image, Instance, Ip, Iso,
    LaunchInstanceOpts, StorageType, UpdateInstanceOpts,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ImageModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub custom: Value<bool>,
    pub state: Value<String>,
    pub market_apps: Value<Vec<String>>,
    pub storage_types: Value<Vec<String>>,
    pub flavour: Value<String>,
    pub region: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct IsoModel {
    pub id: Value<String>,
    pub name: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct InstanceIpModel {
    pub ip: Value<String>,
    pub instance_id: Value<String>,
    pub reverse_lookup: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ContractModel {
    pub billing_frequency: Value<i32>,
    pub term: Value<i32>,
    #[serde(rename = "type")]
    pub contract_type: Value<String>,
    pub ends_at: Value<String>,
    pub state: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct InstanceModel {
    pub id: Value<String>,
    pub region: Value<String>,
    pub reference: Value<String>,
    pub image: Value<ImageModel>,
    pub iso: Value<IsoModel>,
    pub state: Value<String>,
    #[serde(rename = "type")]
    pub instance_type: Value<String>,
    pub root_disk_size: Value<i32>,
    pub root_disk_storage_type: Value<String>,
    pub ips: Value<Vec<InstanceIpModel>>,
    pub contract: Value<ContractModel>,
    pub market_app_id: Value<String>,
    pub ssh_key: Value<String>,
    pub user_data: Value<String>,
}

/// Nested image attributes. `id_attribute` is how the image id is set:
/// required on the resource, computed in data sources.
pub(crate) fn image_attributes(id_attribute: Attribute) -> Attributes {
    attributes([
        ("id", id_attribute),
        ("name", Attribute::string().computed()),
        ("custom", Attribute::bool().computed()),
        ("state", Attribute::string().computed()),
        (
            "market_apps",
            Attribute::list(leaseweb_framework::AttrType::String).computed(),
        ),
        (
            "storage_types",
            Attribute::list(leaseweb_framework::AttrType::String).computed(),
        ),
        ("flavour", Attribute::string().computed()),
        ("region", Attribute::string().computed()),
    ])
}

pub(crate) fn iso_attributes() -> Attributes {
    attributes([
        ("id", Attribute::string().computed()),
        ("name", Attribute::string().computed()),
    ])
}

fn ip_attributes() -> Attributes {
    attributes([
        ("ip", Attribute::string().computed()),
        ("instance_id", Attribute::string().computed()),
        ("reverse_lookup", Attribute::string().computed()),
    ])
}

pub(crate) fn contract_attributes() -> Attributes {
    let terms: Vec<i64> = CONTRACT_TERMS.iter().map(|t| i64::from(*t)).collect();
    let frequencies: Vec<i64> = BILLING_FREQUENCIES.iter().map(|f| i64::from(*f)).collect();
    attributes([
        (
            "billing_frequency",
            Attribute::int32()
                .required()
                .description("The billing frequency (in months).")
                .validator(one_of_ints(&frequencies)),
        ),
        (
            "term",
            Attribute::int32()
                .required()
                .description("Contract term (in months). Used only when type is MONTHLY.")
                .validator(one_of_ints(&terms)),
        ),
        (
            "type",
            Attribute::string()
                .required()
                .validator(one_of_strings(&ContractType::values())),
        ),
        ("ends_at", Attribute::string().computed()),
        ("state", Attribute::string().computed()),
    ])
}

pub(crate) fn adapt_image(image: &Image) -> ImageModel {
    ImageModel {
        id: Value::string(&image.id),
        name: Value::string(&image.name),
        custom: Value::Known(image.custom),
        state: Value::from_option(image.state.map(|s| s.to_string())),
        market_apps: Value::Known(image.market_apps.clone()),
        storage_types: adapt_string_list(&image.storage_types),
        flavour: Value::string(&image.flavour),
        region: adapt_nullable_string(image.get_region_ok()),
    }
}

pub(crate) fn adapt_iso(iso: &Iso) -> IsoModel {
    IsoModel {
        id: Value::string(&iso.id),
        name: Value::string(&iso.name),
    }
}

pub(crate) fn adapt_contract(contract: &Contract) -> ContractModel {
    ContractModel {
        billing_frequency: Value::Known(contract.billing_frequency),
        term: Value::Known(contract.term),
        contract_type: Value::string(contract.contract_type.as_str()),
        ends_at: adapt_nullable_time(contract.get_ends_at_ok()),
        state: Value::string(contract.state.as_str()),
    }
}

/// Project an instance. Launch-only fields are carried over from `prior`.
pub(crate) fn adapt_instance(
    instance: &Instance,
    prior: Option<&InstanceModel>,
    diags: &mut Diagnostics,
) -> InstanceModel {
    let adapt_ip = |ip: &Ip| InstanceIpModel {
        ip: Value::string(&ip.ip),
        instance_id: Value::string(&instance.id),
        reverse_lookup: adapt_nullable_string(ip.get_reverse_lookup_ok()),
    };

    let mut market_app_id = adapt_nullable_string(instance.get_market_app_id_ok());
    if market_app_id.is_null() {
        if let Some(prior) = prior {
            market_app_id = prior.market_app_id.clone();
        }
    }

    InstanceModel {
        id: Value::string(&instance.id),
        region: Value::string(&instance.region),
        reference: adapt_nullable_string(instance.get_reference_ok()),
        image: adapt_sdk_model_to_resource_object(
            &instance.image,
            &object_type(image_attributes(Attribute::string().computed())),
            adapt_image,
            diags,
        ),
        iso: adapt_nullable_sdk_model_to_resource_object(
            instance.get_iso_ok(),
            &object_type(iso_attributes()),
            adapt_iso,
            diags,
        ),
        state: Value::string(instance.state.as_str()),
        instance_type: Value::string(&instance.instance_type),
        root_disk_size: Value::Known(instance.root_disk_size),
        root_disk_storage_type: Value::string(instance.root_disk_storage_type.as_str()),
        ips: adapt_sdk_models_to_list_value(
            &instance.ips,
            &object_type(ip_attributes()),
            adapt_ip,
            diags,
        ),
        contract: adapt_sdk_model_to_resource_object(
            &instance.contract,
            &object_type(contract_attributes()),
            adapt_contract,
            diags,
        ),
        market_app_id,
        ssh_key: prior.map(|p| p.ssh_key.clone()).unwrap_or_default(),
        user_data: prior.map(|p| p.user_data.clone()).unwrap_or_default(),
    }
}

fn required_string(value: &Value<String>, attribute: &str) -> Result<String> {
    value
        .as_known()
        .cloned()
        .ok_or_else(|| ProviderError::invalid_value(attribute, "value must be known"))
}

fn required_int(value: &Value<i32>, attribute: &str) -> Result<i32> {
    value
        .as_known()
        .copied()
        .ok_or_else(|| ProviderError::invalid_value(attribute, "value must be known"))
}

impl InstanceModel {
    fn contract(&self) -> Result<&ContractModel> {
        self.contract
            .as_known()
            .ok_or_else(|| ProviderError::invalid_value("contract", "value must be known"))
    }

    fn launch_opts(&self) -> Result<LaunchInstanceOpts> {
        let image_id = match self.image.as_known() {
            Some(image) => required_string(&image.id, "image.id")?,
            None => return Err(ProviderError::invalid_value("image", "value must be known")),
        };
        let contract = self.contract()?;

        Ok(LaunchInstanceOpts {
            region: required_string(&self.region, "region")?,
            instance_type: required_string(&self.instance_type, "type")?,
            image_id,
            contract_type: required_string(&contract.contract_type, "contract.type")?,
            contract_term: required_int(&contract.term, "contract.term")?,
            billing_frequency: required_int(
                &contract.billing_frequency,
                "contract.billing_frequency",
            )?,
            root_disk_storage_type: required_string(
                &self.root_disk_storage_type,
                "root_disk_storage_type",
            )?,
            reference: optional_non_empty_string(&self.reference),
            root_disk_size: self.root_disk_size.as_known().copied(),
            market_app_id: optional_non_empty_string(&self.market_app_id),
            ssh_key: optional_non_empty_string(&self.ssh_key),
            user_data: optional_non_empty_string(&self.user_data),
        })
    }

    /// Changed, set fields only. Zero term and frequency mean "not set".
    fn update_opts(&self, state: &InstanceModel) -> UpdateInstanceOpts {
        let contract = self.contract.as_known().cloned().unwrap_or_default();
        let instance_type = match self.instance_type.as_known() {
            Some(t) if state.instance_type.as_known() != Some(t) => Some(t.clone()),
            _ => None,
        };

        UpdateInstanceOpts {
            instance_type: instance_type.filter(|t| !t.is_empty()),
            reference: optional_string(&self.reference),
            contract_type: optional_non_empty_string(&contract.contract_type),
            contract_term: optional_non_zero(&contract.term),
            billing_frequency: optional_non_zero(&contract.billing_frequency),
            root_disk_size: optional_non_zero(&self.root_disk_size),
        }
    }
}

/// `leaseweb_publiccloud_instance`
#[derive(Default)]
pub struct InstanceResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for InstanceResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_instance")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "id",
                Attribute::string()
                    .computed()
                    .description("The instance unique identifier")
                    .plan_modifier(use_state_for_unknown()),
            ),
            (
                "region",
                Attribute::string()
                    .required()
                    .description("Region to launch the instance in")
                    .plan_modifier(requires_replace()),
            ),
            (
                "reference",
                Attribute::string()
                    .optional()
                    .computed()
                    .description("The identifying name set to the instance")
                    .validator(string_length_between(1, 255)),
            ),
            (
                "image",
                Attribute::single_nested(image_attributes(
                    Attribute::string()
                        .required()
                        .description("Image ID to launch the instance with")
                        .plan_modifier(requires_replace()),
                ))
                .required(),
            ),
            ("iso", Attribute::single_nested(iso_attributes()).computed()),
            (
                "state",
                Attribute::string()
                    .computed()
                    .description("The instance's current state"),
            ),
            (
                "type",
                Attribute::string()
                    .required()
                    .description("Instance type; must be available in the region"),
            ),
            (
                "root_disk_size",
                Attribute::int32()
                    .optional()
                    .computed()
                    .description("The root disk's size in GB. Must be at least 5 GB for Linux and FreeBSD instances and 50 GB for Windows instances")
                    .validator(int_between(5, 1000)),
            ),
            (
                "root_disk_storage_type",
                Attribute::string()
                    .required()
                    .description("The root disk's storage type")
                    .validator(one_of_strings(&StorageType::values()))
                    .plan_modifier(requires_replace()),
            ),
            ("ips", Attribute::list_nested(ip_attributes()).computed()),
            (
                "contract",
                Attribute::single_nested(contract_attributes())
                    .required()
                    .validator(contract_term()),
            ),
            (
                "market_app_id",
                Attribute::string()
                    .optional()
                    .description("Market App ID that must be installed into the instance")
                    .plan_modifier(requires_replace_if_configured()),
            ),
            (
                "ssh_key",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .description("Public SSH key to install at launch")
                    .plan_modifier(requires_replace()),
            ),
            (
                "user_data",
                Attribute::string()
                    .optional()
                    .description("Base64 encoded cloud-init user data, applied at launch")
                    .plan_modifier(requires_replace()),
            ),
        ]))
        .with_description("Manages a public cloud instance")
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
        let Some(plan) = req.plan.get::<InstanceModel>(&mut resp.diagnostics) else {
            return;
        };
        let opts = match plan.launch_opts() {
            Ok(opts) => opts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error creating public cloud instance", e.to_string());
                return;
            }
        };

        info!(
            region = %opts.region,
            instance_type = %opts.instance_type,
            "Launching public cloud instance"
        );
        let api = client.client.public_cloud();
        let launched = match call(ctx, api.launch_instance(opts).execute()).await {
            Ok((instance, _)) => instance,
            Err(e) => {
                report_error(
                    "Error creating public cloud instance",
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        let instance = match call(ctx, api.get_instance(&launched.id).execute()).await {
            Ok((instance, _)) => instance,
            Err(e) => {
                report_error(
                    &format!("Unable to read details of instance {}", launched.id),
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        let state = adapt_instance(&instance, Some(&plan), &mut resp.diagnostics);
        resp.state.set(&state, &mut resp.diagnostics);
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req.state.get::<InstanceModel>(&mut resp.diagnostics) else {
            return;
        };
        let id = prior.id.as_str();

        let instance = match call(
            ctx,
            client.client.public_cloud().get_instance(id).execute(),
        )
        .await
        {
            Ok((instance, _)) => instance,
            Err(e) if e.is_not_found() => {
                warn!(
                    id,
                    "Public cloud instance no longer exists, removing from state"
                );
                resp.state.remove();
                return;
            }
            Err(e) => {
                report_error(
                    &format!("Unable to read details of instance {}", id),
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        let state = adapt_instance(&instance, Some(&prior), &mut resp.diagnostics);
        resp.state.set(&state, &mut resp.diagnostics);
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let (Some(plan), Some(state)) = (
            req.plan.get::<InstanceModel>(&mut resp.diagnostics),
            req.state.get::<InstanceModel>(&mut resp.diagnostics),
        ) else {
            return;
        };
        let id = state.id.as_str();
        let opts = plan.update_opts(&state);

        info!(id, "Updating public cloud instance");
        let api = client.client.public_cloud();
        let instance = match call(ctx, api.update_instance(id, opts).execute()).await {
            Ok((instance, _)) => instance,
            Err(e) => {
                report_error(
                    &format!("Unable to update instance {}", id),
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        let new_state = adapt_instance(&instance, Some(&plan), &mut resp.diagnostics);
        resp.state.set(&new_state, &mut resp.diagnostics);
    }

    async fn delete(&self, ctx: &Context, req: DeleteRequest, resp: &mut DeleteResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(state) = req.state.get::<InstanceModel>(&mut resp.diagnostics) else {
            return;
        };

        let ends_at = state
            .contract
            .as_known()
            .map(|c| c.ends_at.clone())
            .unwrap_or_default();
        validate_instance_termination(&state.state, &ends_at, &mut resp.diagnostics);
        if resp.diagnostics.has_error() {
            return;
        }

        let id = state.id.as_str();
        info!(id, "Terminating public cloud instance");
        let api = client.client.public_cloud();
        match call(ctx, api.terminate_instance(id).execute()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                warn!(id, "Public cloud instance already gone");
            }
            Err(e) => report_error(
                &format!("Unable to terminate instance {}", id),
                &e,
                &mut resp.diagnostics,
            ),
        }
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
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };

        if req.plan.is_null() {
            let Some(state) = req.state.get::<InstanceModel>(&mut resp.diagnostics) else {
                return;
            };
            let ends_at = state
                .contract
                .as_known()
                .map(|c| c.ends_at.clone())
                .unwrap_or_default();
            validate_instance_termination(&state.state, &ends_at, &mut resp.diagnostics);
            return;
        }

        let Some(plan) = req.plan.get::<InstanceModel>(&mut resp.diagnostics) else {
            return;
        };
        let state = if req.state.is_null() {
            InstanceModel::default()
        } else {
            match req.state.get::<InstanceModel>(&mut resp.diagnostics) {
                Some(state) => state,
                None => return,
            }
        };

        if state.region != plan.region {
            validate_region(ctx, client, &plan.region, &mut resp.diagnostics).await;
        }
        validate_instance_type(
            ctx,
            client,
            &plan.region,
            &plan.instance_type,
            &state.region,
            &state.instance_type,
            &mut resp.diagnostics,
        )
        .await;
    }
}
