//! Leaseweb resources and data sources
//!
//! [`LeasewebProvider`] exposes the public cloud, DNS and IP management
//! APIs as resources and data sources for a declarative host. Every
//! resource follows the same shape: typed models with tri-state fields,
//! adapters from SDK DTOs into those models, and diagnostics instead of
//! errors at the host boundary.
//!
//! # Modules
//!
//! - [`publiccloud`]: instances, ISOs, IPs, images, load balancer listeners
//!   and target groups
//! - [`dns`]: resource record sets
//! - [`ipmgmt`]: IPs and null routes
//! - [`validators`]: checks that need the upstream API
//! - [`utils`]: pagination, fan-out, error mapping and adapters

pub mod dns;
pub mod error;
pub mod ipmgmt;
pub mod provider;
pub mod publiccloud;
pub mod utils;
pub mod validators;

#[cfg(test)]
mod fixtures;

pub use error::{ProviderError, Result};
pub use provider::{LeasewebProvider, PROVIDER_TYPE_NAME, ProviderClient};
