//! Weekly aggregation: mean headcount per (weekday, shift) and staffing
//!
//! Everything here is a pure function of an observation slice. Results are
//! recomputed on every call and are never a source of truth.

use crate::observation::{Observation, Shift, Weekday};
use crate::staffing::recommend;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean headcount and recommended staff for one (weekday, shift) slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub weekday: Weekday,
    pub shift: Shift,
    pub average_headcount: f64,
    pub recommended_staff: u8,
}

/// Schedule row scoped to the last completed week
pub type WeeklySummaryEntry = ScheduleEntry;

/// Slot with the highest mean headcount in the weekly summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusiestSlot {
    pub weekday: Weekday,
    pub shift: Shift,
    pub average_headcount: f64,
}

/// Aggregation over the most recently completed Monday–Sunday week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub entries: Vec<WeeklySummaryEntry>,
    pub busiest_slot: Option<BusiestSlot>,
    pub weakest_day: Option<Weekday>,
}

impl WeeklySummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    total: u64,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, headcount: u32) {
        self.total += u64::from(headcount);
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.total as f64 / self.count as f64
    }
}

/// Group, average and sort (weekday order, then shift order)
fn grouped_means<'a>(
    observations: impl IntoIterator<Item = &'a Observation>,
) -> BTreeMap<(Weekday, Shift), Accumulator> {
    let mut groups: BTreeMap<(Weekday, Shift), Accumulator> = BTreeMap::new();
    for obs in observations {
        groups
            .entry((obs.weekday(), obs.shift()))
            .or_default()
            .add(obs.headcount());
    }
    groups
}

fn entries_from(groups: BTreeMap<(Weekday, Shift), Accumulator>) -> Vec<ScheduleEntry> {
    groups
        .into_iter()
        .map(|((weekday, shift), acc)| {
            let average_headcount = acc.mean();
            ScheduleEntry {
                weekday,
                shift,
                average_headcount,
                recommended_staff: recommend(average_headcount),
            }
        })
        .collect()
}

/// Recommended schedule over the full observation history
///
/// One entry per (weekday, shift) pair observed at least once, sorted by
/// weekday (Monday first) and then shift (Morning, Afternoon, Evening).
pub fn schedule(observations: &[Observation]) -> Vec<ScheduleEntry> {
    entries_from(grouped_means(observations))
}

/// First and last day of the last fully completed Monday–Sunday week
///
/// For any `today`, this is the week before the one containing `today`.
pub fn previous_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_since_monday = u64::from(today.weekday().num_days_from_monday());
    let start = today - Days::new(days_since_monday + 7);
    (start, start + Days::new(6))
}

/// Weekly summary for the week before the one containing `today`
///
/// An empty week yields no entries and no insights; that is a normal state.
pub fn weekly_summary(observations: &[Observation], today: NaiveDate) -> WeeklySummary {
    let (week_start, week_end) = previous_week(today);
    let in_week = observations
        .iter()
        .filter(|obs| obs.date() >= week_start && obs.date() <= week_end);

    let entries = entries_from(grouped_means(in_week));
    let busiest_slot = busiest_slot(&entries);
    let weakest_day = weakest_day(&entries);

    tracing::debug!(
        "weekly summary {}..={}: {} slots",
        week_start,
        week_end,
        entries.len()
    );

    WeeklySummary {
        week_start,
        week_end,
        entries,
        busiest_slot,
        weakest_day,
    }
}

/// Entry with the maximum mean; the first one wins a tie
pub fn busiest_slot(entries: &[ScheduleEntry]) -> Option<BusiestSlot> {
    let mut best: Option<&ScheduleEntry> = None;
    for entry in entries {
        if best.map_or(true, |b| entry.average_headcount > b.average_headcount) {
            best = Some(entry);
        }
    }
    best.map(|entry| BusiestSlot {
        weekday: entry.weekday,
        shift: entry.shift,
        average_headcount: entry.average_headcount,
    })
}

/// Weekday with the lowest mean of its slot averages
///
/// Weekdays without any entry count as 0. The earliest weekday wins a tie.
/// Returns `None` only when `entries` is empty.
pub fn weakest_day(entries: &[ScheduleEntry]) -> Option<Weekday> {
    if entries.is_empty() {
        return None;
    }

    let mut weakest: Option<(Weekday, f64)> = None;
    for day in Weekday::ALL {
        let averages: Vec<f64> = entries
            .iter()
            .filter(|e| e.weekday == day)
            .map(|e| e.average_headcount)
            .collect();
        let mean = if averages.is_empty() {
            0.0
        } else {
            averages.iter().sum::<f64>() / averages.len() as f64
        };

        if weakest.map_or(true, |(_, lowest)| mean < lowest) {
            weakest = Some((day, mean));
        }
    }
    weakest.map(|(day, _)| day)
}

/// Mean headcount per weekday and shift, 0 where nothing was observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftPivot {
    /// `values[weekday.index()][shift.index()]`
    pub values: [[f64; 3]; 7],
}

impl ShiftPivot {
    pub fn get(&self, weekday: Weekday, shift: Shift) -> f64 {
        self.values[weekday.index()][shift.index()]
    }

    /// Largest value in the table (0 for an empty table)
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(0.0_f64, f64::max)
    }
}

/// Weekday × shift table of means, the chart's input
pub fn pivot(observations: &[Observation]) -> ShiftPivot {
    let mut values = [[0.0; 3]; 7];
    for ((weekday, shift), acc) in grouped_means(observations) {
        values[weekday.index()][shift.index()] = acc.mean();
    }
    ShiftPivot { values }
}
