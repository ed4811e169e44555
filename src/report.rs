//! Report materializer: durable schedule, weekly summary and chart artifacts
//!
//! Artifacts are caches for external readers. A failed write is returned as a
//! [`PersistenceWarning`] and never invalidates the aggregation it came from.

use crate::aggregate::{ScheduleEntry, WeeklySummaryEntry};
use crate::error::PersistenceWarning;
use crate::store::write_atomic;
use std::io;
use std::path::{Path, PathBuf};

/// Column names of the schedule and weekly summary artifacts
pub const ENTRY_HEADER: [&str; 4] = ["weekday", "shift", "average_headcount", "recommended_staff"];

/// Encode schedule rows as CSV, header first, in the given order
pub fn entries_csv(entries: &[ScheduleEntry]) -> io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ENTRY_HEADER)?;
    for entry in entries {
        writer.write_record([
            entry.weekday.label().to_string(),
            entry.shift.label().to_string(),
            format!("{:.2}", entry.average_headcount),
            entry.recommended_staff.to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error())
}

/// Writes derived tables to their configured locations
///
/// An artifact without a path is skipped silently.
#[derive(Debug, Clone, Default)]
pub struct ReportMaterializer {
    schedule_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
    chart_path: Option<PathBuf>,
}

impl ReportMaterializer {
    pub fn new(schedule_path: impl Into<PathBuf>, summary_path: impl Into<PathBuf>) -> Self {
        Self {
            schedule_path: Some(schedule_path.into()),
            summary_path: Some(summary_path.into()),
            chart_path: None,
        }
    }

    /// Materializer that writes nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_chart(mut self, chart_path: impl Into<PathBuf>) -> Self {
        self.chart_path = Some(chart_path.into());
        self
    }

    pub fn schedule_path(&self) -> Option<&Path> {
        self.schedule_path.as_deref()
    }

    pub fn summary_path(&self) -> Option<&Path> {
        self.summary_path.as_deref()
    }

    pub fn chart_path(&self) -> Option<&Path> {
        self.chart_path.as_deref()
    }

    /// Persist the full-history schedule table
    pub fn write_schedule(&self, entries: &[ScheduleEntry]) -> Result<(), PersistenceWarning> {
        Self::write_entries(self.schedule_path.as_deref(), entries)
    }

    /// Persist the last-week summary table
    pub fn write_summary(&self, entries: &[WeeklySummaryEntry]) -> Result<(), PersistenceWarning> {
        Self::write_entries(self.summary_path.as_deref(), entries)
    }

    /// Persist the rendered SVG chart
    pub fn write_chart(&self, svg: &str) -> Result<(), PersistenceWarning> {
        match self.chart_path.as_deref() {
            Some(path) => Self::write_bytes(path, svg.as_bytes()),
            None => Ok(()),
        }
    }

    fn write_entries(path: Option<&Path>, entries: &[ScheduleEntry]) -> Result<(), PersistenceWarning> {
        let Some(path) = path else {
            return Ok(());
        };
        let bytes = entries_csv(entries).map_err(|e| PersistenceWarning::ArtifactWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::write_bytes(path, &bytes)
    }

    fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), PersistenceWarning> {
        write_atomic(path, bytes).map_err(|e| {
            let warning = PersistenceWarning::ArtifactWrite {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            tracing::warn!("{}", warning);
            warning
        })
    }
}
