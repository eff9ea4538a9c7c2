//! IP management resources and data sources

mod ip;
mod ips;
mod null_route;
mod null_routes;

pub use ip::IpResource;
pub use ips::IpDataSource;
pub use null_route::NullRouteResource;
pub use null_routes::NullRoutesDataSource;
