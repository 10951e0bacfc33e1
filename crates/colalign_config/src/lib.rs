//! Analyzer configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `COLALIGN_*` environment variables. Command-line flags are applied on top
//! by the binary.

pub mod connection;
pub mod report;
pub mod types;

pub use crate::connection::ConnectionConfig;
pub use crate::report::{ReportConfig, ReportFormat};
pub use crate::types::TypeConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Looks up one environment variable by name.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Complete analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Database connection and target schema
    pub connection: ConnectionConfig,

    /// Type layout fallback and overrides
    pub types: TypeConfig,

    /// Report output settings
    pub report: ReportConfig,
}

impl AnalyzerConfig {
    /// Load configuration from TOML file
    #[cfg(feature = "toml-config")]
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AnalyzerConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from TOML file (stub when toml feature is disabled)
    #[cfg(not(feature = "toml-config"))]
    pub fn from_file(_path: &Path) -> anyhow::Result<Self> {
        anyhow::bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    /// Config file when given, defaults otherwise, then environment variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.merge_with_env())
    }

    /// Merge with environment variables (env vars take precedence)
    pub fn merge_with_env(self) -> Self {
        self.merge_with(&process_env)
    }

    /// Merge with variables from `lookup`. Unparseable values are ignored.
    pub fn merge_with(mut self, lookup: EnvLookup<'_>) -> Self {
        self.connection.apply_env(lookup);
        self.types.apply_env(lookup);
        self.report.apply_env(lookup);
        self
    }
}
