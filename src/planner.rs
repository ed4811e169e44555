//! Staffing planner: record, aggregate and materialize in one call
//!
//! The planner owns no state. It borrows the record store and the report
//! materializer it is handed, so every caller decides where data lives.

use crate::aggregate::{schedule, weekly_summary, ScheduleEntry, WeeklySummary};
use crate::chart::render_chart;
use crate::error::{Outcome, SaveError};
use crate::html_report::HtmlDashboard;
use crate::observation::{Observation, Shift};
use crate::report::ReportMaterializer;
use crate::store::{FileStorage, RecordStore, Storage};

/// Result of a successful `record`
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    /// Full persisted set, including the new observation
    pub observations: Vec<Observation>,
    /// Schedule recomputed from `observations`
    pub schedule: Vec<ScheduleEntry>,
}

/// Glue between the record store, the aggregator and the report artifacts
#[derive(Debug)]
pub struct StaffingPlanner<'a, S: Storage = FileStorage> {
    store: &'a RecordStore<S>,
    reports: &'a ReportMaterializer,
}

impl<'a, S: Storage> StaffingPlanner<'a, S> {
    pub fn new(store: &'a RecordStore<S>, reports: &'a ReportMaterializer) -> Self {
        Self { store, reports }
    }

    pub fn store(&self) -> &RecordStore<S> {
        self.store
    }

    /// Save one observation, then refresh the schedule and chart artifacts
    ///
    /// # Errors
    /// Any [`SaveError`] from the store. Artifact failures are warnings.
    pub fn record(
        &self,
        date: &str,
        shift: Shift,
        headcount: u32,
    ) -> Result<Outcome<Recorded>, SaveError> {
        let saved = self.store.save(date, shift, headcount)?;
        let mut outcome = Outcome::with_warnings((), saved.warnings);

        let entries = schedule(&saved.value);
        self.materialize_schedule(&entries, &mut outcome);
        self.materialize_chart(&render_chart(&saved.value), &mut outcome);

        Ok(outcome.map(|()| Recorded {
            observations: saved.value,
            schedule: entries,
        }))
    }

    /// Schedule over the full history, written to the schedule artifact
    pub fn schedule(&self) -> Outcome<Vec<ScheduleEntry>> {
        let loaded = self.store.load();
        let mut outcome = Outcome::with_warnings((), loaded.warnings);
        let entries = schedule(&loaded.value);
        self.materialize_schedule(&entries, &mut outcome);
        outcome.map(|()| entries)
    }

    /// Summary of the last completed week
    ///
    /// The summary artifact is only written when the week had observations.
    pub fn weekly_report(&self) -> Outcome<WeeklySummary> {
        let loaded = self.store.load();
        let mut outcome = Outcome::with_warnings((), loaded.warnings);
        let summary = weekly_summary(&loaded.value, self.store.today());

        if summary.is_empty() {
            tracing::debug!(
                "no observations between {} and {}, summary not written",
                summary.week_start,
                summary.week_end
            );
        } else if let Err(warning) = self.reports.write_summary(&summary.entries) {
            outcome.warnings.push(warning);
        }

        outcome.map(|()| summary)
    }

    /// SVG chart of the full history, written to the chart artifact
    pub fn chart(&self) -> Outcome<String> {
        let loaded = self.store.load();
        let mut outcome = Outcome::with_warnings((), loaded.warnings);
        let svg = render_chart(&loaded.value);
        self.materialize_chart(&svg, &mut outcome);
        outcome.map(|()| svg)
    }

    /// Single-page HTML view of the chart, schedule and weekly report
    pub fn dashboard(&self) -> Outcome<String> {
        let loaded = self.store.load();
        let entries = schedule(&loaded.value);
        let summary = weekly_summary(&loaded.value, self.store.today());
        let html = HtmlDashboard::default().to_html(&render_chart(&loaded.value), &entries, &summary);
        Outcome::with_warnings(html, loaded.warnings)
    }

    fn materialize_schedule(&self, entries: &[ScheduleEntry], outcome: &mut Outcome<()>) {
        if let Err(warning) = self.reports.write_schedule(entries) {
            outcome.warnings.push(warning);
        }
    }

    fn materialize_chart(&self, svg: &str, outcome: &mut Outcome<()>) {
        if let Err(warning) = self.reports.write_chart(svg) {
            outcome.warnings.push(warning);
        }
    }
}
