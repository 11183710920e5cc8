use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::app::ports::{IngestionPort, OutputStorePort, QueryPort, RowSourcePort};
use crate::payload::IngestPayload;
use crate::tasks;
use crate::validate::validate_records;

/// Result of one end-to-end pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub batch_id: String,
    pub validated_count: usize,
    pub returned_count: usize,
    pub output_location: String,
    pub finished_at: DateTime<Utc>,
}

/// Sequences the end-to-end flow: fetch rows, validate, batch-ingest,
/// read back, persist results. No retries and no partial-success handling;
/// any collaborator failure aborts the run and re-invocation is the
/// caller's decision.
pub struct PipelineRunner {
    source: Box<dyn RowSourcePort>,
    ingestion: Box<dyn IngestionPort>,
    query: Box<dyn QueryPort>,
    output: Box<dyn OutputStorePort>,
}

impl PipelineRunner {
    pub fn new(
        source: Box<dyn RowSourcePort>,
        ingestion: Box<dyn IngestionPort>,
        query: Box<dyn QueryPort>,
        output: Box<dyn OutputStorePort>,
    ) -> Self {
        Self {
            source,
            ingestion,
            query,
            output,
        }
    }

    pub async fn run(
        &self,
        source_location: &str,
        target_location: &str,
        dataset_id: &str,
    ) -> Result<PipelineSummary> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id, dataset_id);
        // Entering the span guard across awaits would mis-scope it and make
        // the future !Send; instrument the whole run instead.
        self.run_steps(source_location, target_location, dataset_id)
            .instrument(span)
            .await
    }

    async fn run_steps(
        &self,
        source_location: &str,
        target_location: &str,
        dataset_id: &str,
    ) -> Result<PipelineSummary> {
        let rows = self
            .source
            .fetch(source_location)
            .await
            .map_err(|e| anyhow!("row source fetch failed: {e}"))?;
        info!(fetched = rows.len(), "fetched raw records");

        let validated = validate_records(&rows);
        let validated_count = validated.len();
        info!(validated = validated_count, dropped = rows.len() - validated_count, "validated records");

        let payload = IngestPayload::new(dataset_id, validated);
        let batch_id = tasks::ingest_batch(self.ingestion.as_ref(), &payload).await?;

        let sql = format!("SELECT * FROM {dataset_id} LIMIT 100");
        let result_rows = tasks::run_query(self.query.as_ref(), &sql).await?;
        let returned_count = result_rows.len();

        let body = serde_json::to_vec(&result_rows)?;
        self.output
            .write(target_location, body)
            .await
            .map_err(|e| anyhow!("output write to {target_location} failed: {e}"))?;

        Ok(PipelineSummary {
            batch_id,
            validated_count,
            returned_count,
            output_location: target_location.to_string(),
            finished_at: Utc::now(),
        })
    }
}
