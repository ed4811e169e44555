//! Shift observations: the recorded unit of customer traffic
//!
//! An observation is one headcount for a calendar date and a shift. The
//! weekday is never stored on its own; it is derived from the date every
//! time it is asked for, so it cannot drift from the date it belongs to.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Day of the week, in the store's fixed Monday-first order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Weekday a calendar date falls on
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }

    /// Localized name written to the store and the reports
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "segunda-feira",
            Weekday::Tuesday => "terça-feira",
            Weekday::Wednesday => "quarta-feira",
            Weekday::Thursday => "quinta-feira",
            Weekday::Friday => "sexta-feira",
            Weekday::Saturday => "sábado",
            Weekday::Sunday => "domingo",
        }
    }

    /// Position in the Monday-first order (Monday = 0)
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Daily time window in which customers are counted
///
/// Variant order is the reporting order: Morning, Afternoon, Evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    /// All shifts in reporting order
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Evening];

    /// Label written to the store and the reports
    pub fn label(self) -> &'static str {
        match self {
            Shift::Morning => "Manhã",
            Shift::Afternoon => "Tarde",
            Shift::Evening => "Noite",
        }
    }

    /// Position in reporting order (Morning = 0)
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Shift {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Raw shift text that names none of the known shifts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shift '{0}' (expected Manhã, Tarde or Noite)")]
pub struct ParseShiftError(pub String);

impl FromStr for Shift {
    type Err = ParseShiftError;

    /// Accepts the stored labels (accent and case insensitive) and the English names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('ã', "a");
        match normalized.as_str() {
            "manha" | "morning" => Ok(Shift::Morning),
            "tarde" | "afternoon" => Ok(Shift::Afternoon),
            "noite" | "evening" => Ok(Shift::Evening),
            _ => Err(ParseShiftError(s.to_string())),
        }
    }
}

/// One recorded headcount for a date and shift
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    date: NaiveDate,
    shift: Shift,
    headcount: u32,
}

impl Observation {
    pub fn new(date: NaiveDate, shift: Shift, headcount: u32) -> Self {
        Self {
            date,
            shift,
            headcount,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Weekday of [`Observation::date`], recomputed on every call
    pub fn weekday(&self) -> Weekday {
        Weekday::from_date(self.date)
    }

    pub fn shift(&self) -> Shift {
        self.shift
    }

    pub fn headcount(&self) -> u32 {
        self.headcount
    }

    /// True if this observation occupies the given (date, shift) slot
    pub fn is_slot(&self, date: NaiveDate, shift: Shift) -> bool {
        self.date == date && self.shift == shift
    }
}

impl Serialize for Observation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Observation", 4)?;
        state.serialize_field("date", &self.date.format(DATE_FORMAT).to_string())?;
        state.serialize_field("weekday", &self.weekday())?;
        state.serialize_field("shift", &self.shift)?;
        state.serialize_field("headcount", &self.headcount)?;
        state.end()
    }
}

/// ISO-8601 calendar date format used everywhere a date is written
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a calendar date, discarding any time-of-day component
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// RFC 3339 timestamps. Returns `None` for anything that is not a real
/// calendar date (e.g. `2025-02-30`).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|datetime| datetime.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_derived_from_date() {
        // 2025-06-02 was a Monday
        assert_eq!(Weekday::from_date(date(2025, 6, 2)), Weekday::Monday);
        assert_eq!(Weekday::from_date(date(2025, 6, 7)), Weekday::Saturday);
        assert_eq!(Weekday::from_date(date(2025, 6, 8)), Weekday::Sunday);
    }

    #[test]
    fn test_weekday_labels_are_localized() {
        let labels: Vec<&str> = Weekday::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(
            labels,
            vec![
                "segunda-feira",
                "terça-feira",
                "quarta-feira",
                "quinta-feira",
                "sexta-feira",
                "sábado",
                "domingo"
            ]
        );
    }

    #[test]
    fn test_weekday_index_follows_monday_first_order() {
        for (i, day) in Weekday::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn test_shift_order_is_declared_order() {
        assert!(Shift::Morning < Shift::Afternoon);
        assert!(Shift::Afternoon < Shift::Evening);
    }

    #[test]
    fn test_shift_parses_stored_labels() {
        assert_eq!("Manhã".parse::<Shift>().unwrap(), Shift::Morning);
        assert_eq!("Tarde".parse::<Shift>().unwrap(), Shift::Afternoon);
        assert_eq!("Noite".parse::<Shift>().unwrap(), Shift::Evening);
    }

    #[test]
    fn test_shift_parses_unaccented_and_english() {
        assert_eq!("manha".parse::<Shift>().unwrap(), Shift::Morning);
        assert_eq!(" MANHÃ ".parse::<Shift>().unwrap(), Shift::Morning);
        assert_eq!("evening".parse::<Shift>().unwrap(), Shift::Evening);
    }

    #[test]
    fn test_shift_rejects_unknown_label() {
        let err = "madrugada".parse::<Shift>().unwrap_err();
        assert_eq!(err, ParseShiftError("madrugada".to_string()));
        assert!(err.to_string().contains("madrugada"));
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2025-06-02"), Some(date(2025, 6, 2)));
        assert_eq!(parse_date("  2025-06-02 "), Some(date(2025, 6, 2)));
    }

    #[test]
    fn test_parse_date_discards_time() {
        assert_eq!(parse_date("2025-06-02 18:30:00"), Some(date(2025, 6, 2)));
        assert_eq!(parse_date("2025-06-02T08:00:00"), Some(date(2025, 6, 2)));
        assert_eq!(
            parse_date("2025-06-02T23:59:59-03:00"),
            Some(date(2025, 6, 2))
        );
    }

    #[test]
    fn test_parse_date_rejects_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("2025-13-01"), None);
    }

    #[test]
    fn test_observation_serializes_with_derived_weekday() {
        let obs = Observation::new(date(2025, 6, 3), Shift::Morning, 42);
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["date"], "2025-06-03");
        assert_eq!(json["weekday"], "terça-feira");
        assert_eq!(json["shift"], "Manhã");
        assert_eq!(json["headcount"], 42);
    }

    #[test]
    fn test_observation_is_slot() {
        let obs = Observation::new(date(2025, 6, 3), Shift::Evening, 1);
        assert!(obs.is_slot(date(2025, 6, 3), Shift::Evening));
        assert!(!obs.is_slot(date(2025, 6, 3), Shift::Morning));
        assert!(!obs.is_slot(date(2025, 6, 4), Shift::Evening));
    }
}
