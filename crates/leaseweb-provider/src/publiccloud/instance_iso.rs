//! ISO attached to a public cloud instance
//!
//! The resource keeps two ids: `desired_id` is what the user asks for and
//! `id` is what the instance reports. Applying the resource drives the
//! instance from the observed ISO to the desired one:
//!
//! | desired | observed | action                 |
//! |---------|----------|------------------------|
//! | null    | null     | none                   |
//! | null    | y        | detach                 |
//! | x       | null     | attach x               |
//! | x       | x        | none                   |
//! | x       | y        | detach, then attach x  |
//!
//! Detach and attach are separate upstream calls. When the attach after a
//! successful detach fails, the instance is left without an ISO.

use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::{call, configure_client, require_client};
use crate::validators::validate_iso;
use leaseweb_framework::planmodifier::requires_replace;
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, AttributePath, ConfigureRequest, Context, CreateRequest, CreateResponse,
    DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse,
    MetadataRequest, ModifyPlanRequest, ModifyPlanResponse, ReadRequest, ReadResponse, Resource,
    Schema, UpdateRequest, UpdateResponse, Value, async_trait, import_state_passthrough_id,
};
use leaseweb_sdk::PublicCloudApi;
use leaseweb_sdk::models::publiccloud::{AttachIsoOpts, Instance};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct InstanceIsoModel {
    instance_id: Value<String>,
    desired_id: Value<String>,
    id: Value<String>,
    name: Value<String>,
}

impl InstanceIsoModel {
    /// Observed ISO of `instance`. An unknown `desired_id` (after import)
    /// takes the observed id.
    fn observe(instance: &Instance, desired_id: &Value<String>) -> Self {
        let iso = instance.get_iso_ok();
        let id = Value::from_option(iso.map(|iso| iso.id.clone()));
        let desired_id = if desired_id.is_unknown() {
            id.clone()
        } else {
            desired_id.clone()
        };
        Self {
            instance_id: Value::string(&instance.id),
            desired_id,
            id,
            name: Value::from_option(iso.map(|iso| iso.name.clone())),
        }
    }
}

enum Transition<'a> {
    None,
    Detach,
    Attach(&'a str),
    Swap(&'a str),
}

fn transition<'a>(desired: Option<&'a str>, observed: Option<&str>) -> Transition<'a> {
    match (desired, observed) {
        (None, None) => Transition::None,
        (None, Some(_)) => Transition::Detach,
        (Some(x), None) => Transition::Attach(x),
        (Some(x), Some(y)) if x == y => Transition::None,
        (Some(x), Some(_)) => Transition::Swap(x),
    }
}

/// Move `instance_id` to the `desired` ISO and return the instance as
/// observed afterwards. `None` means an error was reported.
async fn reconcile(
    ctx: &Context,
    api: &PublicCloudApi,
    instance_id: &str,
    desired: Option<&str>,
    diags: &mut Diagnostics,
) -> Option<Instance> {
    let instance = match call(ctx, api.get_instance(instance_id).execute()).await {
        Ok((instance, _)) => instance,
        Err(e) => {
            report_error(
                &format!("Unable to read details of instance {}", instance_id),
                &e,
                diags,
            );
            return None;
        }
    };
    let observed = instance.get_iso_ok().map(|iso| iso.id.as_str());

    let attach = match transition(desired, observed) {
        Transition::None => {
            debug!(instance_id, "ISO already converged");
            return Some(instance);
        }
        Transition::Detach => None,
        Transition::Attach(x) => Some((x, false)),
        Transition::Swap(x) => Some((x, true)),
    };

    let detach = !matches!(attach, Some((_, false)));
    if detach {
        info!(instance_id, "Detaching ISO from instance");
        if let Err(e) = call(ctx, api.detach_instance_iso(instance_id).execute()).await {
            report_error(
                &format!("Unable to detach ISO from instance {}", instance_id),
                &e,
                diags,
            );
            return None;
        }
    }

    if let Some((iso_id, _)) = attach {
        info!(instance_id, iso_id, "Attaching ISO to instance");
        let opts = AttachIsoOpts {
            iso_id: iso_id.to_string(),
        };
        if let Err(e) = call(ctx, api.attach_instance_iso(instance_id, opts).execute()).await {
            let summary = if detach {
                format!(
                    "Unable to attach ISO {} to instance {}; the previous ISO has been detached",
                    iso_id, instance_id
                )
            } else {
                format!(
                    "Unable to attach ISO {} to instance {}",
                    iso_id, instance_id
                )
            };
            report_error(&summary, &e, diags);
            return None;
        }
    }

    match call(ctx, api.get_instance(instance_id).execute()).await {
        Ok((instance, _)) => Some(instance),
        Err(e) => {
            report_error(
                &format!("Unable to read details of instance {}", instance_id),
                &e,
                diags,
            );
            None
        }
    }
}

/// `leaseweb_publiccloud_instance_iso`
#[derive(Default)]
pub struct InstanceIsoResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for InstanceIsoResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_instance_iso")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "instance_id",
                Attribute::string()
                    .required()
                    .description("The instance unique identifier")
                    .plan_modifier(requires_replace()),
            ),
            (
                "desired_id",
                Attribute::string()
                    .optional()
                    .description("ISO to attach. Leave unset to detach any attached ISO"),
            ),
            (
                "id",
                Attribute::string()
                    .computed()
                    .description("ISO currently attached to the instance"),
            ),
            ("name", Attribute::string().computed()),
        ]))
        .with_description("Attaches an ISO to a public cloud instance")
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
        let Some(plan) = req.plan.get::<InstanceIsoModel>(&mut resp.diagnostics) else {
            return;
        };

        let api = client.client.public_cloud();
        let Some(instance) = reconcile(
            ctx,
            &api,
            plan.instance_id.as_str(),
            plan.desired_id.as_known().map(String::as_str),
            &mut resp.diagnostics,
        )
        .await
        else {
            return;
        };

        let state = InstanceIsoModel::observe(&instance, &plan.desired_id);
        resp.state.set(&state, &mut resp.diagnostics);
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req.state.get::<InstanceIsoModel>(&mut resp.diagnostics) else {
            return;
        };
        let instance_id = prior.instance_id.as_str();

        let api = client.client.public_cloud();
        let instance = match call(ctx, api.get_instance(instance_id).execute()).await {
            Ok((instance, _)) => instance,
            Err(e) if e.is_not_found() => {
                warn!(
                    instance_id,
                    "Instance no longer exists, removing ISO from state"
                );
                resp.state.remove();
                return;
            }
            Err(e) => {
                report_error(
                    &format!("Unable to read details of instance {}", instance_id),
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        let state = InstanceIsoModel::observe(&instance, &prior.desired_id);
        resp.state.set(&state, &mut resp.diagnostics);
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let (Some(plan), Some(state)) = (
            req.plan.get::<InstanceIsoModel>(&mut resp.diagnostics),
            req.state.get::<InstanceIsoModel>(&mut resp.diagnostics),
        ) else {
            return;
        };

        if plan.desired_id == state.id {
            debug!(
                instance_id = state.instance_id.as_str(),
                "Desired ISO already attached"
            );
            let converged = InstanceIsoModel {
                desired_id: plan.desired_id,
                ..state
            };
            resp.state.set(&converged, &mut resp.diagnostics);
            return;
        }

        let api = client.client.public_cloud();
        let Some(instance) = reconcile(
            ctx,
            &api,
            state.instance_id.as_str(),
            plan.desired_id.as_known().map(String::as_str),
            &mut resp.diagnostics,
        )
        .await
        else {
            return;
        };

        let new_state = InstanceIsoModel::observe(&instance, &plan.desired_id);
        resp.state.set(&new_state, &mut resp.diagnostics);
    }

    async fn delete(&self, ctx: &Context, req: DeleteRequest, resp: &mut DeleteResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(state) = req.state.get::<InstanceIsoModel>(&mut resp.diagnostics) else {
            return;
        };
        if state.id.is_null() {
            return;
        }

        let instance_id = state.instance_id.as_str();
        info!(instance_id, "Detaching ISO from instance");
        let api = client.client.public_cloud();
        match call(ctx, api.detach_instance_iso(instance_id).execute()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                warn!(instance_id, "Instance already gone");
            }
            Err(e) => report_error(
                &format!("Unable to detach ISO from instance {}", instance_id),
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
        import_state_passthrough_id("instance_id", &req.id, resp);
        resp.state.set_attribute(
            &AttributePath::root("desired_id"),
            &Value::<String>::Unknown,
            &mut resp.diagnostics,
        );
    }

    async fn modify_plan(
        &self,
        ctx: &Context,
        req: ModifyPlanRequest,
        resp: &mut ModifyPlanResponse,
    ) {
        if req.plan.is_null() {
            return;
        }
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req.plan.get::<InstanceIsoModel>(&mut resp.diagnostics) else {
            return;
        };
        let observed: Value<String> = if req.state.is_null() {
            Value::Null
        } else {
            req.state
                .get_attribute(&AttributePath::root("id"), &mut resp.diagnostics)
        };

        if plan.desired_id.is_known() && plan.desired_id != observed {
            validate_iso(ctx, client, &plan.desired_id, &mut resp.diagnostics).await;
        }
    }
}
