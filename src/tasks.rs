//! Operator-shaped task functions, the units a scheduler sequences. The
//! pipeline use case composes them; the CLI also exposes them standalone.

use anyhow::{anyhow, Result};
use tracing::info;

use crate::app::ports::{IngestionPort, QueryPort};
use crate::payload::IngestPayload;
use crate::records::RawRecord;

/// Uploads one NDJSON payload as a platform batch: open, upload, commit.
/// Returns the batch id. A zero-record payload is still sent as an empty
/// batch; skipping it would silently change sink-side bookkeeping.
pub async fn ingest_batch(
    ingestion: &dyn IngestionPort,
    payload: &IngestPayload,
) -> Result<String> {
    let batch_id = ingestion
        .open_batch(&payload.dataset_id)
        .await
        .map_err(|e| anyhow!("open batch failed: {e}"))?;

    let ndjson = payload.to_ndjson()?;
    ingestion
        .upload(&batch_id, ndjson.into_bytes())
        .await
        .map_err(|e| anyhow!("upload to batch {batch_id} failed: {e}"))?;

    ingestion
        .commit(&batch_id)
        .await
        .map_err(|e| anyhow!("commit of batch {batch_id} failed: {e}"))?;

    info!(%batch_id, records = payload.records.len(), "committed batch");
    Ok(batch_id)
}

/// Executes a read-back query and returns the result rows.
pub async fn run_query(query: &dyn QueryPort, sql: &str) -> Result<Vec<RawRecord>> {
    let rows = query
        .execute(sql)
        .await
        .map_err(|e| anyhow!("query failed: {e}"))?;
    info!(rows = rows.len(), "query returned rows");
    Ok(rows)
}
