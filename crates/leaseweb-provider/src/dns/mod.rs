//! DNS resources and data sources

mod resource_record_set;
mod resource_record_sets;

pub use resource_record_set::ResourceRecordSetResource;
pub use resource_record_sets::ResourceRecordSetsDataSource;
