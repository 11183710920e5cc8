use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Credentials and endpoints for the platform clients. Resolved from
/// `config.toml` when present, with environment variables taking
/// precedence. Passed explicitly into client construction; there are no
/// process-wide client singletons.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
    #[serde(default = "defaults::placeholder")]
    pub client_id: String,
    #[serde(default = "defaults::placeholder")]
    pub access_token: String,
    #[serde(default = "defaults::placeholder")]
    pub org_id: String,
    #[serde(default = "defaults::sandbox")]
    pub sandbox: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            client_id: defaults::placeholder(),
            access_token: defaults::placeholder(),
            org_id: defaults::placeholder(),
            sandbox: defaults::sandbox(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://platform.adobe.io".to_string()
    }

    // Placeholder keeps offline/test environments working without real
    // credentials, matching the sandbox-first workflow.
    pub fn placeholder() -> String {
        "test".to_string()
    }

    pub fn sandbox() -> String {
        "prod".to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl Config {
    /// Loads `config.toml` from the working directory if it exists, then
    /// applies environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let overrides = [
            ("AEP_BASE_URL", &mut self.platform.base_url),
            ("AEP_CLIENT_ID", &mut self.platform.client_id),
            ("AEP_ACCESS_TOKEN", &mut self.platform.access_token),
            ("AEP_ORG_ID", &mut self.platform.org_id),
            ("AEP_SANDBOX", &mut self.platform.sandbox),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.platform.base_url, "https://platform.adobe.io");
        assert_eq!(config.platform.sandbox, "prod");
    }

    #[test]
    fn config_file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[platform]\nbase_url = \"https://example.test\"\nsandbox = \"dev\""
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.platform.base_url, "https://example.test");
        assert_eq!(config.platform.sandbox, "dev");
        assert_eq!(config.platform.client_id, "test");
    }
}
