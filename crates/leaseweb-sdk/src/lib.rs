//! Leaseweb REST API client
//!
//! One service per API domain ([`PublicCloudApi`], [`DnsApi`],
//! [`IpMgmtApi`]). Every endpoint is a request builder with `with_*`
//! setters and an async `execute()` returning the decoded body together
//! with the raw [`HttpResponse`].
//!
//! Requests go through a [`Transport`]; [`ReqwestTransport`] talks to the
//! real API and signs requests with the `X-LSW-Auth` header.

pub mod client;
pub mod dns;
pub mod error;
pub mod ipmgmt;
pub mod models;
pub mod pagination;
pub mod publiccloud;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use client::{Client, Configuration};
pub use dns::DnsApi;
pub use error::{Result, SdkError};
pub use ipmgmt::IpMgmtApi;
pub use models::ErrorResponse;
pub use pagination::{ListResponse, Metadata, PagedRequest};
pub use publiccloud::PublicCloudApi;
pub use transport::{ApiRequest, HttpResponse, Method, ReqwestTransport, Transport};
