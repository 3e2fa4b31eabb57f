//! Configuration management for HealthGuard

use crate::types::domain::Domain;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "HEALTHGUARD_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web surface binds to
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8501".to_string(),
        }
    }
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directory containing ONNX model files
    pub models_dir: String,
    /// Artifact file name per domain
    pub files: ModelFiles,
    /// Number of threads for ONNX inference per model (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            models_dir: "models".to_string(),
            files: ModelFiles::default(),
            onnx_threads: 1,
        }
    }
}

/// Artifact file names, relative to `models_dir`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelFiles {
    pub diabetes: String,
    pub heart: String,
    pub parkinsons: String,
}

impl ModelFiles {
    pub fn for_domain(&self, domain: Domain) -> &str {
        match domain {
            Domain::Diabetes => &self.diabetes,
            Domain::Heart => &self.heart,
            Domain::Parkinsons => &self.parkinsons,
        }
    }
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self {
            diabetes: Domain::Diabetes.default_model_file().to_string(),
            heart: Domain::Heart.default_model_file().to_string(),
            parkinsons: Domain::Parkinsons.default_model_file().to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Seconds between logged summaries
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from the path given on the command line, the
    /// `HEALTHGUARD_CONFIG` variable, or the default location.
    ///
    /// Only the default location may be absent, in which case built-in
    /// defaults apply.
    pub fn load() -> Result<Self> {
        let explicit = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .map(PathBuf::from);

        match explicit {
            Some(path) => Self::load_from_path(path),
            None => Self::build(Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(path.as_ref(), true)
    }

    fn build(path: &Path, required: bool) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix("HEALTHGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(toml: &str) -> NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        f.write_all(toml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8501");
        assert_eq!(config.models.models_dir, "models");
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(
            config.models.files.for_domain(Domain::Heart),
            "heart_model.onnx"
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let file = write_toml(
            r#"
[models]
models_dir = "/srv/models"

[models.files]
parkinsons = "parkinsons_svc.onnx"
"#,
        );

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.models.models_dir, "/srv/models");
        assert_eq!(
            config.models.files.for_domain(Domain::Parkinsons),
            "parkinsons_svc.onnx"
        );
        assert_eq!(
            config.models.files.for_domain(Domain::Diabetes),
            "diabetes_model.onnx"
        );
        assert_eq!(config.server.listen_addr, "0.0.0.0:8501");
        assert_eq!(config.metrics.report_interval_secs, 300);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from_path(dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = AppConfig::load_from_path(path).unwrap();
        assert_eq!(config.models.files.heart, "heart_model.onnx");
        assert_eq!(config.logging.format, "pretty");
    }
}
