//! TOML configuration for the store and artifact locations

use crate::report::ReportMaterializer;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_FILE: &str = "escala.toml";

/// Locations of the store and its artifacts
///
/// # Example TOML
/// ```toml
/// data_file = "movimento_loja.csv"
/// schedule_file = "escala_funcionarios.csv"
/// summary_file = "relatorio_semanal.csv"
/// chart_file = "grafico_turnos.svg"
/// recent_days = 7
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscalaConfig {
    /// Observation store (CSV)
    pub data_file: PathBuf,

    /// Recommended schedule over the full history
    pub schedule_file: PathBuf,

    /// Last completed week's summary
    pub summary_file: PathBuf,

    /// Bar chart of mean headcount (SVG)
    pub chart_file: PathBuf,

    /// Default window for `recent`
    pub recent_days: u32,
}

impl Default for EscalaConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("movimento_loja.csv"),
            schedule_file: PathBuf::from("escala_funcionarios.csv"),
            summary_file: PathBuf::from("relatorio_semanal.csv"),
            chart_file: PathBuf::from("grafico_turnos.svg"),
            recent_days: 7,
        }
    }
}

impl EscalaConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load a config file; relative paths inside it resolve against its directory
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        tracing::debug!("loaded config from {}", path.display());
        Ok(config.relative_to(base))
    }

    /// Explicit file, else `escala.toml` if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn relative_to(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            data_file: resolve(self.data_file),
            schedule_file: resolve(self.schedule_file),
            summary_file: resolve(self.summary_file),
            chart_file: resolve(self.chart_file),
            recent_days: self.recent_days,
        }
    }

    pub fn store(&self) -> RecordStore {
        RecordStore::open(&self.data_file)
    }

    pub fn materializer(&self) -> ReportMaterializer {
        ReportMaterializer::new(&self.schedule_file, &self.summary_file).with_chart(&self.chart_file)
    }
}
