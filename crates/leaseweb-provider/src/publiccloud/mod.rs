//! Public cloud resources and data sources

mod image;
mod images;
mod instance;
mod instance_iso;
mod instance_types;
mod instances;
mod ip;
mod isos;
mod load_balancer_listener;
mod load_balancer_listeners;
mod regions;
mod target_group;
mod target_groups;

pub use image::ImageResource;
pub use images::ImagesDataSource;
pub use instance::InstanceResource;
pub use instance_iso::InstanceIsoResource;
pub use instance_types::InstanceTypesDataSource;
pub use instances::InstancesDataSource;
pub use ip::IpResource;
pub use isos::IsosDataSource;
pub use load_balancer_listener::LoadBalancerListenerResource;
pub use load_balancer_listeners::LoadBalancerListenersDataSource;
pub use regions::RegionsDataSource;
pub use target_group::TargetGroupResource;
pub use target_groups::TargetGroupsDataSource;
