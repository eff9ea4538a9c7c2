pub mod data_source;
pub mod resource;
pub mod schema;
