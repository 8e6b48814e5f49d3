//! Council configuration
//!
//! Loaded from YAML (`config/council.yaml` unless `COUNCIL_CONFIG` points
//! elsewhere). A missing file means built-in defaults; a malformed one is an
//! error. `COUNCIL_API_URL` overrides the collaborator base URL.
//!
//! Timing constants are product contracts and deliberately not configurable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use council_types::validation::clamp_advisor_count;
use council_ui::SessionDefaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/council.yaml";
pub const CONFIG_PATH_ENV: &str = "COUNCIL_CONFIG";
pub const API_URL_ENV: &str = "COUNCIL_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Container size the CLI assumes when rendering the sphere
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CouncilConfig {
    pub api: ApiConfig,
    pub defaults: SessionDefaults,
    pub viewport: ViewportConfig,
}

impl CouncilConfig {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: CouncilConfig = serde_yaml::from_str(content)?;
        config.defaults.advisor_count = clamp_advisor_count(config.defaults.advisor_count);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if it exists, else defaults; then apply overrides
    pub fn load_or_default(path: &Path, api_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            tracing::info!(path = %path.display(), "loading configuration");
            Self::from_file(path)?
        } else {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            Self::default()
        };
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(%url, "collaborator URL overridden from environment");
            config.api.base_url = url;
        }
        Ok(config)
    }

    /// Resolve the path and overrides from the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_or_default(Path::new(&path), std::env::var(API_URL_ENV).ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_types::ReflectionFocus;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = CouncilConfig::from_yaml(
            r#"
api:
  base_url: https://council.example.com
defaults:
  advisor_count: 12
  reflection_focus: Self-Understanding
  cognitive_style: enfp
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://council.example.com");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.defaults.advisor_count, 7);
        assert_eq!(config.defaults.reflection_focus, ReflectionFocus::SelfUnderstanding);
        assert_eq!(
            config.defaults.cognitive_style.as_ref().map(|s| s.as_str()),
            Some("ENFP")
        );
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn unknown_style_is_a_parse_error() {
        assert!(CouncilConfig::from_yaml("defaults:\n  cognitive_style: ABCD\n").is_err());
    }

    #[test]
    fn missing_file_uses_defaults_with_override() {
        let config = CouncilConfig::load_or_default(
            Path::new("does/not/exist.yaml"),
            Some("http://127.0.0.1:8080".into()),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.defaults, SessionDefaults::default());
    }

    #[test]
    fn shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = CouncilConfig::from_file(&path).unwrap();
        assert_eq!(config.defaults.reflection_focus, ReflectionFocus::DecisionMaking);
    }
}
