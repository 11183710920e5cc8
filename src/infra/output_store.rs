use async_trait::async_trait;
use std::path::Path;

use crate::app::ports::OutputStorePort;

/// Output store that resolves the location by scheme: HTTP(S) URLs get a
/// PUT with the configured bearer token, anything else is written as a
/// local file (parent directories created as needed).
pub struct ObjectStoreWriter {
    bearer_token: Option<String>,
}

impl ObjectStoreWriter {
    pub fn new(bearer_token: Option<String>) -> Self {
        Self { bearer_token }
    }
}

#[async_trait]
impl OutputStorePort for ObjectStoreWriter {
    async fn write(&self, location: &str, bytes: Vec<u8>) -> Result<(), String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let client = reqwest::Client::new();
            let mut req = client
                .put(location)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
            if let Some(token) = &self.bearer_token {
                req = req.header("Authorization", format!("Bearer {token}"));
            }
            let resp = req.send().await.map_err(|e| e.to_string())?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(format!("output upload failed: {status} - {body}"));
            }
            Ok(())
        } else {
            let path = Path::new(location);
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
            }
            std::fs::write(path, bytes).map_err(|e| e.to_string())
        }
    }
}
