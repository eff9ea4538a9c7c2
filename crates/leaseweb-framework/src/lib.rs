//! Leaseweb provider framework
//!
//! Host-facing building blocks shared by every resource and data source of
//! the Leaseweb provider: tri-state values, attribute paths, diagnostics,
//! schemas with validators and plan modifiers, the plan engine and the
//! in-process [`ProviderServer`] that dispatches host operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            Declarative host runtime              │
//! │      (validate / plan / apply / read / import)   │
//! └─────────────────┬───────────────────────────────┘
//!                   │ JSON values + diagnostics
//! ┌─────────────────▼───────────────────────────────┐
//! │               leaseweb-framework                 │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │ ProviderServer│  │ Schema / Plan engine     │ │
//! │  └──────┬───────┘  └──────────────────────────┘ │
//! │  ┌──────▼───────────────────────────────────┐   │
//! │  │ trait Resource / DataSource / Provider    │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼────────┐
//! │ leaseweb-      │
//! │ provider       │
//! └────────────────┘
//! ```

pub mod context;
pub mod datasource;
pub mod diag;
pub mod error;
pub mod import;
pub mod path;
pub mod plan;
pub mod planmodifier;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod server;
pub mod validator;
pub mod value;

// Re-exports
pub use context::{Context, Interrupted};
pub use datasource::{DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{FrameworkError, Result};
pub use import::{import_state_passthrough_id, parse_import_id};
pub use path::{AttributePath, PathStep};
pub use plan::PlanResult;
pub use planmodifier::PlanModifier;
pub use provider::{
    Provider, ProviderConfigureRequest, ProviderConfigureResponse, ProviderData, ProviderMetadata,
};
pub use resource::{
    ConfigureRequest, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse,
    ImportStateRequest, ImportStateResponse, MetadataRequest, ModifyPlanRequest,
    ModifyPlanResponse, ReadRequest, ReadResponse, Resource, ResourceData, UpdateRequest,
    UpdateResponse, ValidateConfigRequest,
};
pub use schema::{AttrType, Attribute, Attributes, Schema};
pub use server::ProviderServer;
pub use validator::Validator;
pub use value::{UNKNOWN_VALUE, Value};

// Re-export async_trait for resource implementations
pub use async_trait::async_trait;
