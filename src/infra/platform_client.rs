use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{json, Value};

use crate::app::ports::{IngestionPort, QueryPort};
use crate::config::PlatformConfig;
use crate::records::RawRecord;

/// HTTP client for the platform's batch-ingestion and query-service APIs.
/// Token acquisition is out of scope; the access token comes from the
/// config. Construct one per run and drop it afterwards.
pub struct PlatformClient {
    http: reqwest::Client,
    config: PlatformConfig,
}

impl PlatformClient {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(
            "Authorization",
            format!("Bearer {}", self.config.access_token),
        )
        .header("x-api-key", &self.config.client_id)
        .header("x-gw-ims-org-id", &self.config.org_id)
        .header("x-sandbox-name", &self.config.sandbox)
    }

    async fn expect_success(resp: reqwest::Response, context: &str) -> Result<Value, String> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(format!("{context}: {status} - {body}"));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| format!("{context}: bad response body: {e}"))
    }
}

#[async_trait]
impl IngestionPort for PlatformClient {
    async fn open_batch(&self, dataset_id: &str) -> Result<String, String> {
        let url = format!("{}/data/foundation/import/batches", self.config.base_url);
        let body = json!({
            "datasetId": dataset_id,
            "inputFormat": { "format": "json", "isMultiLineJson": false }
        });
        let resp = self
            .with_auth(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let value = Self::expect_success(resp, "create batch failed").await?;
        value
            .get("id")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| "create batch response missing id".to_string())
    }

    async fn upload(&self, batch_id: &str, bytes: Vec<u8>) -> Result<(), String> {
        let url = format!(
            "{}/data/foundation/import/batches/{}/files/part-00000.json",
            self.config.base_url, batch_id
        );
        let resp = self
            .with_auth(self.http.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Self::expect_success(resp, "batch upload failed").await?;
        Ok(())
    }

    async fn commit(&self, batch_id: &str) -> Result<(), String> {
        let url = format!(
            "{}/data/foundation/import/batches/{}?action=COMPLETE",
            self.config.base_url, batch_id
        );
        let resp = self
            .with_auth(self.http.post(&url))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Self::expect_success(resp, "batch commit failed").await?;
        Ok(())
    }
}

#[async_trait]
impl QueryPort for PlatformClient {
    async fn execute(&self, sql: &str) -> Result<Vec<RawRecord>, String> {
        let url = format!("{}/data/foundation/query/queries", self.config.base_url);
        let resp = self
            .with_auth(self.http.post(&url))
            .json(&json!({ "sql": sql }))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let value = Self::expect_success(resp, "query execution failed").await?;
        match value.get("results") {
            Some(results) => serde_json::from_value(results.clone())
                .map_err(|e| format!("query results not row objects: {e}")),
            None => Ok(Vec::new()),
        }
    }
}
