//! Report output configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::EnvLookup;

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One delimited row per column
    #[default]
    Csv,
    /// Rows plus table summary and run metadata
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory receiving one report file per table
    pub output_dir: PathBuf,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            format: ReportFormat::Csv,
        }
    }
}

impl ReportConfig {
    pub(crate) fn apply_env(&mut self, lookup: EnvLookup<'_>) {
        if let Some(dir) = lookup("COLALIGN_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(val) = lookup("COLALIGN_REPORT_FORMAT")
            && let Ok(format) = val.parse()
        {
            self.format = format;
        }
    }
}
