use crate::{Result, TracerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".state-trace.toml";

pub const DEFAULT_PROP_NAME: &str = "?";
pub const DEFAULT_ES_VERSION: &str = "latest";
pub const DEFAULT_MAPPINGS_LOCATION: &str = "https://unpkg.com/source-map@0.7.3/lib/mappings.wasm";
pub const DEFAULT_ENTRY_FRAME: &str = "useDebuggableState";
pub const DEFAULT_DISPATCH_FRAME: &str = "dispatchAction";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Placeholder used when no binding name can be recovered
    pub default_prop_name: String,
    /// Language level of the generated bundle, displayed only
    pub es_version: String,
    /// Location of the mapping engine's support resource
    pub mappings_location: String,
    /// Frame name of the capture entry point
    pub entry_frame: String,
    /// Frame name of the framework's dispatch machinery
    pub dispatch_frame: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            default_prop_name: DEFAULT_PROP_NAME.to_string(),
            es_version: DEFAULT_ES_VERSION.to_string(),
            mappings_location: DEFAULT_MAPPINGS_LOCATION.to_string(),
            entry_frame: DEFAULT_ENTRY_FRAME.to_string(),
            dispatch_frame: DEFAULT_DISPATCH_FRAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format (e.g., "text", "json")
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from a file in the project root, then apply
    /// `STATE_TRACE_*` environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(DEFAULT_CONFIG_FILE))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit path. A missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            TracerError::ConfigError(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            TracerError::ConfigError(format!(
                "Failed to parse TOML config from {:?}: {}",
                config_path, e
            ))
        })?;

        Ok(config)
    }

    /// Load default config if file is missing, otherwise fall back on parse failure
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Warning: Failed to load config: {}. Using defaults.", e);
                let mut config = Config::default();
                config.apply_overrides(|key| std::env::var(key).ok());
                config
            }
        }
    }

    /// Apply overrides from a key lookup, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let trace = &mut self.trace;
        let fields: [(&str, &mut String); 5] = [
            ("STATE_TRACE_DEFAULT_PROP_NAME", &mut trace.default_prop_name),
            ("STATE_TRACE_ES_VERSION", &mut trace.es_version),
            ("STATE_TRACE_MAPPINGS_LOCATION", &mut trace.mappings_location),
            ("STATE_TRACE_ENTRY_FRAME", &mut trace.entry_frame),
            ("STATE_TRACE_DISPATCH_FRAME", &mut trace.dispatch_frame),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }
}
