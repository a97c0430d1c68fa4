//! Data layer: the application record, the registry that holds them,
//! and the views and exports built over it.

pub mod application;
pub mod data_exporter;
pub mod identifier;
pub mod registry;
pub mod table_view;
