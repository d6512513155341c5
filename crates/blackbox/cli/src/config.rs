//! CLI configuration

use crate::error::{CliError, CliResult};
use blackbox_engine::{Capability, TargetConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration file (TOML). Unset fields fall back to the default profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Target service base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Pause between probes in milliseconds
    pub pacing_ms: Option<u64>,

    /// Raw samples kept per capability
    pub sample_size: Option<usize>,

    /// Counterexamples kept per hypothesis
    pub counterexample_limit: Option<usize>,

    /// Capabilities under test; empty keeps the default profile
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
}

impl CliConfig {
    /// Load configuration from file
    ///
    /// An explicit path must exist. The default path is optional.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => {
                let p = PathBuf::from(p);
                if !p.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                p
            }
            None => match Self::default_config_path() {
                Ok(p) if p.exists() => p,
                _ => return Ok(CliConfig::default()),
            },
        };

        let contents = std::fs::read_to_string(&config_path)?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("blackbox").join("config.toml"))
    }

    /// Resolve into a target configuration. `base_url` overrides the file.
    pub fn into_target(self, base_url: Option<String>) -> TargetConfig {
        let mut target = TargetConfig::default();
        if let Some(url) = base_url.or(self.base_url) {
            target.base_url = url;
        }
        if let Some(t) = self.timeout_secs {
            target.timeout_secs = t;
        }
        if let Some(p) = self.pacing_ms {
            target.pacing_ms = p;
        }
        if let Some(s) = self.sample_size {
            target.sample_size = s;
        }
        if let Some(c) = self.counterexample_limit {
            target.counterexample_limit = c;
        }
        if !self.capabilities.is_empty() {
            target.capabilities = self.capabilities;
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackbox_engine::{OutputCategory, DEFAULT_BASE_URL};

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.base_url.is_none());
        let target = config.into_target(None);
        assert_eq!(target.base_url, DEFAULT_BASE_URL);
        assert_eq!(target.capabilities.len(), 6);
    }

    #[test]
    fn test_load_missing_config() {
        let err = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_parse_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            base_url = "http://localhost:3000"
            pacing_ms = 50

            [[capabilities]]
            name = "echo"
            path = "/echo"
            method = "payload"
            category = "string"
            "#,
        )
        .unwrap();
        let target = config.into_target(None);
        assert_eq!(target.base_url, "http://localhost:3000");
        assert_eq!(target.pacing_ms, 50);
        assert_eq!(target.timeout_secs, 30);
        assert_eq!(target.capabilities.len(), 1);
        assert_eq!(target.capabilities[0].category, OutputCategory::String);
    }

    #[test]
    fn test_base_url_override() {
        let config = CliConfig {
            base_url: Some("http://from-file".into()),
            ..CliConfig::default()
        };
        let target = config.into_target(Some("http://from-flag".into()));
        assert_eq!(target.base_url, "http://from-flag");
    }
}
