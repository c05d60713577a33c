use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for scrutineer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrutineerConfig {
    /// Observability settings
    pub observability: ObservabilityConfig,
    /// Scenario runner settings
    pub scenario: ScenarioConfig,
    /// Snapshot settings (optional)
    pub snapshot: Option<SnapshotConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level filter, overridable per module via RUST_LOG syntax
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Scenario file used when `run` is called without a path
    pub default_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// Where to write the engine snapshot after a run
    pub path: String,
}

impl Default for ScrutineerConfig {
    fn default() -> Self {
        Self {
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
            scenario: ScenarioConfig {
                default_path: "election.toml".to_string(),
            },
            snapshot: None,
        }
    }
}

impl ScrutineerConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (scrutineer.toml)
    /// 3. Environment variables (prefixed with SCRUTINEER_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&ScrutineerConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("scrutineer.toml").exists() {
            builder = builder.add_source(File::with_name("scrutineer"));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCRUTINEER")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let scrutineer_config: ScrutineerConfig = config.try_deserialize()?;
        Ok(scrutineer_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ScrutineerConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = ScrutineerConfig::load_env_file();
        ScrutineerConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ScrutineerConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
