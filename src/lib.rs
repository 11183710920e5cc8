pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod payload;
pub mod records;
pub mod tasks;
pub mod validate;
pub mod xdm;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
