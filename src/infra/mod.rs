pub mod output_store;
pub mod platform_client;
pub mod row_source;
