use async_trait::async_trait;

use crate::records::RawRecord;

/// Supplies raw warehouse rows. The location addresses a JSON array of
/// objects; anything else is a hard failure.
#[async_trait]
pub trait RowSourcePort: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<RawRecord>, String>;
}

/// Batch ingestion into the platform. Callers must open, upload, then
/// commit, in that order.
#[async_trait]
pub trait IngestionPort: Send + Sync {
    async fn open_batch(&self, dataset_id: &str) -> Result<String, String>;
    async fn upload(&self, batch_id: &str, bytes: Vec<u8>) -> Result<(), String>;
    async fn commit(&self, batch_id: &str) -> Result<(), String>;
}

/// SQL read-back against the platform's query service.
#[async_trait]
pub trait QueryPort: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<Vec<RawRecord>, String>;
}

/// Persists run output to an external object store.
#[async_trait]
pub trait OutputStorePort: Send + Sync {
    async fn write(&self, location: &str, bytes: Vec<u8>) -> Result<(), String>;
}
