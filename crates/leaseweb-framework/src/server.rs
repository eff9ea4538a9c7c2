//! In-process host boundary
//!
//! [`ProviderServer`] owns a provider with its resources and data sources and
//! exposes the operations a declarative host drives: configure, validate,
//! plan, apply, read, import and data source reads. Values cross the
//! boundary as JSON and every operation returns its diagnostics.

use crate::context::Context;
use crate::datasource::{DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::diag::Diagnostics;
use crate::error::{FrameworkError, Result};
use crate::path::AttributePath;
use crate::plan;
use crate::provider::{Provider, ProviderConfigureRequest, ProviderConfigureResponse};
use crate::resource::{
    ConfigureRequest, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse,
    ImportStateRequest, ImportStateResponse, MetadataRequest, ModifyPlanRequest,
    ModifyPlanResponse, ReadRequest, ReadResponse, Resource, ResourceData, UpdateRequest,
    UpdateResponse, ValidateConfigRequest,
};
use crate::schema::Schema;
use crate::value;
use serde_json::{Value as Raw, json};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Result of planning a resource change
#[derive(Debug, Clone, Default)]
pub struct PlanResourceChangeResponse {
    pub planned_state: Raw,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Diagnostics,
}

/// Result of apply, read, import, and data source reads
#[derive(Debug, Clone, Default)]
pub struct StateResponse {
    pub state: Raw,
    pub diagnostics: Diagnostics,
}

impl StateResponse {
    fn failed(state: Raw, diagnostics: Diagnostics) -> Self {
        Self { state, diagnostics }
    }
}

/// Provider host
pub struct ProviderServer {
    provider: Box<dyn Provider>,
    resources: BTreeMap<String, Box<dyn Resource>>,
    data_sources: BTreeMap<String, Box<dyn DataSource>>,
    configured: bool,
}

impl ProviderServer {
    /// Register the provider's resources and data sources by type name.
    pub fn new(provider: impl Provider + 'static) -> Result<Self> {
        let metadata = MetadataRequest {
            provider_type_name: provider.metadata().type_name,
        };

        let mut resources = BTreeMap::new();
        for resource in provider.resources() {
            let name = resource.metadata(&metadata);
            if resources.insert(name.clone(), resource).is_some() {
                return Err(FrameworkError::DuplicateTypeName(name));
            }
        }

        let mut data_sources = BTreeMap::new();
        for data_source in provider.data_sources() {
            let name = data_source.metadata(&metadata);
            if data_sources.insert(name.clone(), data_source).is_some() {
                return Err(FrameworkError::DuplicateTypeName(name));
            }
        }

        debug!(
            resources = resources.len(),
            data_sources = data_sources.len(),
            "Registered provider types"
        );

        Ok(Self {
            provider: Box::new(provider),
            resources,
            data_sources,
            configured: false,
        })
    }

    pub fn provider_schema(&self) -> Schema {
        self.provider.schema()
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    pub fn resource_schema(&self, type_name: &str) -> Result<Schema> {
        Ok(self.resource(type_name)?.schema())
    }

    pub fn data_source_schema(&self, type_name: &str) -> Result<Schema> {
        Ok(self.data_source(type_name)?.schema())
    }

    /// Every schema the provider exposes, for display.
    pub fn schemas(&self) -> Raw {
        let resources: serde_json::Map<String, Raw> = self
            .resources
            .iter()
            .map(|(name, r)| (name.clone(), r.schema().describe()))
            .collect();
        let data_sources: serde_json::Map<String, Raw> = self
            .data_sources
            .iter()
            .map(|(name, d)| (name.clone(), d.schema().describe()))
            .collect();
        json!({
            "provider": self.provider.schema().describe(),
            "resources": resources,
            "data_sources": data_sources,
        })
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| FrameworkError::UnknownResourceType(type_name.to_string()))
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSource> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| FrameworkError::UnknownDataSourceType(type_name.to_string()))
    }

    fn configured_resource(&self, type_name: &str) -> Result<&dyn Resource> {
        if !self.configured {
            return Err(FrameworkError::NotConfigured);
        }
        self.resource(type_name)
    }

    /// Configure the provider and hand its data to every resource and data
    /// source.
    pub async fn configure(&mut self, ctx: &Context, config: Raw) -> Diagnostics {
        let schema = self.provider.schema();
        let mut diags = plan::validate_config(&schema, &config);
        if diags.has_error() {
            return diags;
        }

        let mut resp = ProviderConfigureResponse::default();
        self.provider
            .configure(
                ctx,
                ProviderConfigureRequest {
                    config: ResourceData::from_raw(config),
                },
                &mut resp,
            )
            .await;
        diags.append(resp.diagnostics);
        if diags.has_error() {
            return diags;
        }

        let req = ConfigureRequest {
            provider_data: resp.provider_data,
        };
        for resource in self.resources.values_mut() {
            resource.configure(&req, &mut diags);
        }
        for data_source in self.data_sources.values_mut() {
            data_source.configure(&req, &mut diags);
        }

        self.configured = !diags.has_error();
        if self.configured {
            info!("Provider configured");
        }
        diags
    }

    /// Run schema validators and the resource's own config validation.
    pub fn validate_resource_config(&self, type_name: &str, config: &Raw) -> Diagnostics {
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(e) => return e.to_diagnostic().into(),
        };
        let mut diags = plan::validate_config(&resource.schema(), config);
        if !config.is_null() {
            resource.validate_config(
                &ValidateConfigRequest {
                    config: ResourceData::from_raw(config.clone()),
                },
                &mut diags,
            );
        }
        diags
    }

    pub fn validate_data_source_config(&self, type_name: &str, config: &Raw) -> Diagnostics {
        match self.data_source(type_name) {
            Ok(data_source) => plan::validate_config(&data_source.schema(), config),
            Err(e) => e.to_diagnostic().into(),
        }
    }

    /// Validate the config, compute the planned state, then let the resource
    /// adjust it. A null config plans destruction.
    pub async fn plan_resource_change(
        &self,
        ctx: &Context,
        type_name: &str,
        prior_state: Raw,
        config: Raw,
    ) -> PlanResourceChangeResponse {
        let resource = match self.configured_resource(type_name) {
            Ok(resource) => resource,
            Err(e) => {
                return PlanResourceChangeResponse {
                    planned_state: prior_state,
                    diagnostics: e.to_diagnostic().into(),
                    ..Default::default()
                };
            }
        };

        let mut diags = self.validate_resource_config(type_name, &config);
        if diags.has_error() {
            return PlanResourceChangeResponse {
                planned_state: prior_state,
                diagnostics: diags,
                ..Default::default()
            };
        }

        let schema = resource.schema();
        let planned = plan::plan_resource_change(&schema, &prior_state, &config, &mut diags);
        if diags.has_error() {
            return PlanResourceChangeResponse {
                planned_state: prior_state,
                diagnostics: diags,
                ..Default::default()
            };
        }

        let mut resp = ModifyPlanResponse {
            plan: ResourceData::from_raw(planned.planned_state.clone()),
            requires_replace: planned.requires_replace,
            diagnostics: Diagnostics::new(),
        };
        resource
            .modify_plan(
                ctx,
                ModifyPlanRequest {
                    config: ResourceData::from_raw(config),
                    plan: ResourceData::from_raw(planned.planned_state),
                    state: ResourceData::from_raw(prior_state),
                },
                &mut resp,
            )
            .await;
        diags.append(resp.diagnostics);

        PlanResourceChangeResponse {
            planned_state: resp.plan.into_raw(),
            requires_replace: resp.requires_replace,
            diagnostics: diags,
        }
    }

    /// Apply a planned change. On any error diagnostic the prior state is
    /// returned unchanged.
    pub async fn apply_resource_change(
        &self,
        ctx: &Context,
        type_name: &str,
        prior_state: Raw,
        planned_state: Raw,
        config: Raw,
    ) -> StateResponse {
        let resource = match self.configured_resource(type_name) {
            Ok(resource) => resource,
            Err(e) => return StateResponse::failed(prior_state, e.to_diagnostic().into()),
        };

        if planned_state.is_null() {
            debug!(type_name, "Applying delete");
            let mut resp = DeleteResponse::default();
            resource
                .delete(
                    ctx,
                    DeleteRequest {
                        state: ResourceData::from_raw(prior_state.clone()),
                    },
                    &mut resp,
                )
                .await;
            if resp.diagnostics.has_error() {
                return StateResponse::failed(prior_state, resp.diagnostics);
            }
            return StateResponse {
                state: Raw::Null,
                diagnostics: resp.diagnostics,
            };
        }

        let (new_state, diags) = if prior_state.is_null() {
            debug!(type_name, "Applying create");
            let mut resp = CreateResponse::default();
            resource
                .create(
                    ctx,
                    CreateRequest {
                        config: ResourceData::from_raw(config),
                        plan: ResourceData::from_raw(planned_state),
                    },
                    &mut resp,
                )
                .await;
            (resp.state.into_raw(), resp.diagnostics)
        } else {
            debug!(type_name, "Applying update");
            let mut resp = UpdateResponse {
                state: ResourceData::from_raw(planned_state.clone()),
                ..Default::default()
            };
            resource
                .update(
                    ctx,
                    UpdateRequest {
                        config: ResourceData::from_raw(config),
                        plan: ResourceData::from_raw(planned_state),
                        state: ResourceData::from_raw(prior_state.clone()),
                    },
                    &mut resp,
                )
                .await;
            (resp.state.into_raw(), resp.diagnostics)
        };

        if diags.has_error() {
            return StateResponse::failed(prior_state, diags);
        }
        self.checked_state(&resource.schema(), prior_state, new_state, diags)
    }

    /// Refresh a resource. A null new state means the object is gone.
    pub async fn read_resource(&self, ctx: &Context, type_name: &str, state: Raw) -> StateResponse {
        let resource = match self.configured_resource(type_name) {
            Ok(resource) => resource,
            Err(e) => return StateResponse::failed(state, e.to_diagnostic().into()),
        };

        let mut resp = ReadResponse {
            state: ResourceData::from_raw(state.clone()),
            ..Default::default()
        };
        resource
            .read(
                ctx,
                ReadRequest {
                    state: ResourceData::from_raw(state.clone()),
                },
                &mut resp,
            )
            .await;
        if resp.diagnostics.has_error() {
            return StateResponse::failed(state, resp.diagnostics);
        }
        let new_state = resp.state.into_raw();
        if new_state.is_null() {
            return StateResponse {
                state: new_state,
                diagnostics: resp.diagnostics,
            };
        }
        self.checked_state(&resource.schema(), state, new_state, resp.diagnostics)
    }

    /// Seed state from an import identifier, then hydrate it with a read.
    pub async fn import_resource_state(
        &self,
        ctx: &Context,
        type_name: &str,
        id: &str,
    ) -> StateResponse {
        let resource = match self.configured_resource(type_name) {
            Ok(resource) => resource,
            Err(e) => return StateResponse::failed(Raw::Null, e.to_diagnostic().into()),
        };

        info!(type_name, id, "Importing resource");
        let mut resp = ImportStateResponse {
            state: ResourceData::from_raw(resource.schema().null_object()),
            ..Default::default()
        };
        resource
            .import_state(ctx, ImportStateRequest { id: id.to_string() }, &mut resp)
            .await;
        if resp.diagnostics.has_error() {
            return StateResponse::failed(Raw::Null, resp.diagnostics);
        }

        let mut diags = resp.diagnostics;
        let read = self
            .read_resource(ctx, type_name, resp.state.into_raw())
            .await;
        diags.append(read.diagnostics);
        if diags.has_error() {
            return StateResponse::failed(Raw::Null, diags);
        }
        if read.state.is_null() {
            diags.add_error(
                "Cannot import non-existent remote object",
                format!(
                    "While attempting to import an existing object to {}, the provider detected that no object exists with the given id {:?}.",
                    type_name, id
                ),
            );
            return StateResponse::failed(Raw::Null, diags);
        }
        StateResponse {
            state: read.state,
            diagnostics: diags,
        }
    }

    pub async fn read_data_source(
        &self,
        ctx: &Context,
        type_name: &str,
        config: Raw,
    ) -> StateResponse {
        if !self.configured {
            let diags = FrameworkError::NotConfigured.to_diagnostic().into();
            return StateResponse::failed(Raw::Null, diags);
        }
        let data_source = match self.data_source(type_name) {
            Ok(data_source) => data_source,
            Err(e) => return StateResponse::failed(Raw::Null, e.to_diagnostic().into()),
        };

        let schema = data_source.schema();
        let diags = plan::validate_config(&schema, &config);
        if diags.has_error() {
            return StateResponse::failed(Raw::Null, diags);
        }

        let mut resp = ReadDataSourceResponse {
            state: ResourceData::from_raw(config.clone()),
            diagnostics: diags,
        };
        data_source
            .read(
                ctx,
                ReadDataSourceRequest {
                    config: ResourceData::from_raw(config),
                },
                &mut resp,
            )
            .await;
        if resp.diagnostics.has_error() {
            return StateResponse::failed(Raw::Null, resp.diagnostics);
        }
        self.checked_state(&schema, Raw::Null, resp.state.into_raw(), resp.diagnostics)
    }

    /// Reject state that does not match the schema or still holds unknowns.
    fn checked_state(
        &self,
        schema: &Schema,
        fallback: Raw,
        new_state: Raw,
        mut diags: Diagnostics,
    ) -> StateResponse {
        if let Err(e) = schema.check(&new_state) {
            diags.push(e.to_diagnostic());
            return StateResponse::failed(fallback, diags);
        }
        if new_state.is_null() || value::contains_unknown(&new_state) {
            diags.add_error(
                "Provider returned invalid result object after apply",
                "After the apply operation, the provider still indicated an unknown value or no object at all. All values must be known after apply.",
            );
            return StateResponse::failed(fallback, diags);
        }
        StateResponse {
            state: new_state,
            diagnostics: diags,
        }
    }
}
