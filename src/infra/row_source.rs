use async_trait::async_trait;

use crate::app::ports::RowSourcePort;
use crate::records::RawRecord;

/// Row source that resolves the location by scheme: HTTP(S) URLs are
/// fetched with reqwest, anything else is read as a local file path.
pub struct ObjectStoreRowSource;

impl ObjectStoreRowSource {
    fn parse(bytes: &[u8]) -> Result<Vec<RawRecord>, String> {
        // The source must be a JSON array of objects; anything else is a
        // malformed top-level input and fails the whole fetch.
        serde_json::from_slice(bytes).map_err(|e| format!("malformed source payload: {e}"))
    }
}

#[async_trait]
impl RowSourcePort for ObjectStoreRowSource {
    async fn fetch(&self, location: &str) -> Result<Vec<RawRecord>, String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let client = reqwest::Client::new();
            let resp = client.get(location).send().await.map_err(|e| e.to_string())?;
            let status = resp.status();
            if !status.is_success() {
                return Err(format!("source fetch failed: {status}"));
            }
            let bytes = resp.bytes().await.map_err(|e| e.to_string())?;
            Self::parse(&bytes)
        } else {
            let bytes = std::fs::read(location).map_err(|e| e.to_string())?;
            Self::parse(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_rows_from_a_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"[{{"customer_id": "1"}}, {{"customer_id": "2"}}]"#).unwrap();

        let source = ObjectStoreRowSource;
        let rows = source.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["customer_id"], "1");
    }

    #[tokio::test]
    async fn non_array_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"customer_id": "1"}}"#).unwrap();

        let source = ObjectStoreRowSource;
        let err = source.fetch(path.to_str().unwrap()).await.unwrap_err();
        assert!(err.contains("malformed source payload"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = ObjectStoreRowSource;
        assert!(source.fetch("/nonexistent/rows.json").await.is_err());
    }
}
