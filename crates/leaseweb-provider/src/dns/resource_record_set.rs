//! DNS resource record sets
//!
//! A record set is addressed by `(domain_name, name, type)`; none of the
//! three can change in place.

use crate::error::{ProviderError, Result};
use crate::provider::ProviderClient;
use crate::utils::adapt::adapt_string_list;
use crate::utils::errors::report_error;
use crate::utils::{call, configure_client, require_client};
use leaseweb_framework::planmodifier::requires_replace;
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::{
    list_items_not_empty, list_size_at_least, one_of_ints, one_of_strings,
};
use leaseweb_framework::{
    AttrType, Attribute, Attributes, ConfigureRequest, Context, CreateRequest, CreateResponse,
    DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse,
    MetadataRequest, ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse,
    Value, async_trait, parse_import_id,
};
use leaseweb_sdk::models::dns::{
    CreateResourceRecordSetOpts, ResourceRecordSet, ResourceRecordSetType, TTL_VALUES,
    UpdateResourceRecordSetOpts,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceRecordSetModel {
    pub domain_name: Value<String>,
    pub name: Value<String>,
    #[serde(rename = "type")]
    pub record_type: Value<String>,
    pub content: Value<Vec<String>>,
    pub ttl: Value<i32>,
}

pub(crate) fn record_set_attributes() -> Attributes {
    attributes([
        (
            "domain_name",
            Attribute::string()
                .required()
                .description("Domain the record set belongs to")
                .plan_modifier(requires_replace()),
        ),
        (
            "name",
            Attribute::string()
                .required()
                .description("Fully qualified record name, e.g. `www.example.com.`")
                .plan_modifier(requires_replace()),
        ),
        (
            "type",
            Attribute::string()
                .required()
                .validator(one_of_strings(&ResourceRecordSetType::values()))
                .plan_modifier(requires_replace()),
        ),
        (
            "content",
            Attribute::list(AttrType::String)
                .required()
                .validator(list_size_at_least(1))
                .validator(list_items_not_empty()),
        ),
        (
            "ttl",
            Attribute::int32()
                .required()
                .validator(one_of_ints(&TTL_VALUES)),
        ),
    ])
}

pub(crate) fn adapt_record_set(
    domain_name: &str,
    record_set: &ResourceRecordSet,
) -> ResourceRecordSetModel {
    ResourceRecordSetModel {
        domain_name: Value::string(domain_name),
        name: Value::string(&record_set.name),
        record_type: Value::string(record_set.record_type.as_str()),
        content: adapt_string_list(&record_set.content),
        ttl: Value::Known(record_set.ttl),
    }
}

impl ResourceRecordSetModel {
    fn record_type(&self) -> Result<ResourceRecordSetType> {
        self.record_type
            .as_str()
            .parse()
            .map_err(|e: String| ProviderError::invalid_value("type", e))
    }

    fn content(&self) -> Result<Vec<String>> {
        self.content
            .as_known()
            .cloned()
            .ok_or_else(|| ProviderError::invalid_value("content", "value must be known"))
    }

    fn ttl(&self) -> Result<i32> {
        self.ttl
            .as_known()
            .copied()
            .ok_or_else(|| ProviderError::invalid_value("ttl", "value must be known"))
    }

    fn create_opts(&self) -> Result<CreateResourceRecordSetOpts> {
        Ok(CreateResourceRecordSetOpts {
            name: self.name.as_str().to_string(),
            record_type: self.record_type()?,
            content: self.content()?,
            ttl: self.ttl()?,
        })
    }

    fn update_opts(&self) -> Result<UpdateResourceRecordSetOpts> {
        Ok(UpdateResourceRecordSetOpts {
            content: self.content()?,
            ttl: self.ttl()?,
        })
    }
}

/// `leaseweb_dns_resource_record_set`
#[derive(Default)]
pub struct ResourceRecordSetResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for ResourceRecordSetResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("dns_resource_record_set")
    }

    fn schema(&self) -> Schema {
        Schema::new(record_set_attributes()).with_description("Manages a DNS resource record set")
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
        let Some(plan) = req
            .plan
            .get::<ResourceRecordSetModel>(&mut resp.diagnostics)
        else {
            return;
        };
        let opts = match plan.create_opts() {
            Ok(opts) => opts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error creating resource record set", e.to_string());
                return;
            }
        };
        let domain_name = plan.domain_name.as_str();

        info!(
            domain_name,
            name = %opts.name,
            record_type = %opts.record_type,
            "Creating resource record set"
        );
        let request = client
            .client
            .dns()
            .create_resource_record_set(domain_name, opts);
        match call(ctx, request.execute()).await {
            Ok((record_set, _)) => {
                let state = adapt_record_set(domain_name, &record_set);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                "Error creating resource record set",
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req
            .state
            .get::<ResourceRecordSetModel>(&mut resp.diagnostics)
        else {
            return;
        };
        let record_type = match prior.record_type() {
            Ok(record_type) => record_type,
            Err(e) => {
                resp.diagnostics
                    .add_error("Unable to read resource record set", e.to_string());
                return;
            }
        };
        let (domain_name, name) = (prior.domain_name.as_str(), prior.name.as_str());

        let request = client
            .client
            .dns()
            .get_resource_record_set(domain_name, name, record_type);
        match call(ctx, request.execute()).await {
            Ok((record_set, _)) => {
                let state = adapt_record_set(domain_name, &record_set);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    domain_name,
                    name,
                    %record_type,
                    "Resource record set no longer exists, removing from state"
                );
                resp.state.remove();
            }
            Err(e) => report_error(
                &format!(
                    "Unable to read resource record set {} {}",
                    name, record_type
                ),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req
            .plan
            .get::<ResourceRecordSetModel>(&mut resp.diagnostics)
        else {
            return;
        };
        let parts = plan
            .record_type()
            .and_then(|record_type| Ok((record_type, plan.update_opts()?)));
        let (record_type, opts) = match parts {
            Ok(parts) => parts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error updating resource record set", e.to_string());
                return;
            }
        };
        let (domain_name, name) = (plan.domain_name.as_str(), plan.name.as_str());

        info!(domain_name, name, %record_type, "Updating resource record set");
        let request = client
            .client
            .dns()
            .update_resource_record_set(domain_name, name, record_type, opts);
        match call(ctx, request.execute()).await {
            Ok((record_set, _)) => {
                let state = adapt_record_set(domain_name, &record_set);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!(
                    "Unable to update resource record set {} {}",
                    name, record_type
                ),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn delete(&self, ctx: &Context, req: DeleteRequest, resp: &mut DeleteResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(state) = req
            .state
            .get::<ResourceRecordSetModel>(&mut resp.diagnostics)
        else {
            return;
        };
        let record_type = match state.record_type() {
            Ok(record_type) => record_type,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error deleting resource record set", e.to_string());
                return;
            }
        };
        let (domain_name, name) = (state.domain_name.as_str(), state.name.as_str());

        info!(domain_name, name, %record_type, "Deleting resource record set");
        let request = client
            .client
            .dns()
            .delete_resource_record_set(domain_name, name, record_type);
        match call(ctx, request.execute()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                warn!(domain_name, name, "Resource record set already gone")
            }
            Err(e) => report_error(
                &format!(
                    "Unable to delete resource record set {} {}",
                    name, record_type
                ),
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
        match parse_import_id(&req.id, ["domain_name", "name", "type"]) {
            Ok([domain_name, name, record_type]) => {
                let seed = ResourceRecordSetModel {
                    domain_name: Value::Known(domain_name),
                    name: Value::Known(name),
                    record_type: Value::Known(record_type),
                    ..Default::default()
                };
                resp.state.set(&seed, &mut resp.diagnostics);
            }
            Err(diag) => resp.diagnostics.push(diag),
        }
    }
}
