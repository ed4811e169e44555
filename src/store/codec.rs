//! CSV encoding of the observation set
//!
//! Written header: `date,weekday,shift,headcount`. On read the weekday column
//! is optional and ignored, extra columns are ignored, and the legacy
//! Portuguese headers (`data`, `dia_da_semana`, `turno`,
//! `quantidade_pessoas`) are accepted.

use crate::error::{Outcome, PersistenceWarning};
use crate::observation::{parse_date, Observation, Shift, DATE_FORMAT};
use serde::Deserialize;
use std::io;

/// Column names written to the store
pub const HEADER: [&str; 4] = ["date", "weekday", "shift", "headcount"];

const REQUIRED: [(&str, &str); 3] = [
    ("date", "data"),
    ("shift", "turno"),
    ("headcount", "quantidade_pessoas"),
];

#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(alias = "data")]
    date: String,
    #[serde(alias = "turno")]
    shift: String,
    #[serde(alias = "quantidade_pessoas")]
    headcount: String,
}

/// Parse a headcount cell; integral floats such as `12.0` are accepted
fn parse_headcount(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<u32>() {
        return Some(n);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

/// Decode stored CSV into observations, dropping rows that cannot be used
pub fn decode(bytes: &[u8]) -> Outcome<Vec<Observation>> {
    let mut outcome = Outcome::new(Vec::new());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            outcome.warn(PersistenceWarning::Unreadable(e.to_string()));
            return outcome;
        }
    };

    // An empty store (no header at all) is not corruption
    if headers.is_empty() {
        return outcome;
    }

    for (name, legacy) in REQUIRED {
        if !headers.iter().any(|h| h == name || h == legacy) {
            outcome.warn(PersistenceWarning::Unreadable(format!(
                "missing column '{}'",
                name
            )));
            return outcome;
        }
    }

    for (index, result) in reader.records().enumerate() {
        // Header is line 1
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                outcome.warn(PersistenceWarning::MalformedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line());

        let row: StoredRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                outcome.warn(PersistenceWarning::MalformedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let Some(date) = parse_date(&row.date) else {
            outcome.warn(PersistenceWarning::UnparseableDate {
                line,
                value: row.date,
            });
            continue;
        };

        let shift = match row.shift.parse::<Shift>() {
            Ok(shift) => shift,
            Err(e) => {
                outcome.warn(PersistenceWarning::MalformedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let Some(headcount) = parse_headcount(&row.headcount) else {
            outcome.warn(PersistenceWarning::MalformedRow {
                line,
                reason: format!("invalid headcount '{}'", row.headcount),
            });
            continue;
        };

        outcome.value.push(Observation::new(date, shift, headcount));
    }

    outcome
}

/// Encode observations as CSV with a header row, in the given order
pub fn encode(observations: &[Observation]) -> io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for obs in observations {
        writer.write_record([
            obs.date().format(DATE_FORMAT).to_string(),
            obs.weekday().label().to_string(),
            obs.shift().label().to_string(),
            obs.headcount().to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Weekday;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_encode_writes_header_for_empty_set() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "date,weekday,shift,headcount\n");
    }

    #[test]
    fn test_encode_writes_localized_weekday() {
        let bytes = encode(&[Observation::new(date(2025, 6, 2), Shift::Morning, 30)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("2025-06-02,segunda-feira,Manhã,30"));
    }

    #[test]
    fn test_decode_reads_what_encode_wrote() {
        let observations = vec![
            Observation::new(date(2025, 6, 2), Shift::Morning, 30),
            Observation::new(date(2025, 6, 3), Shift::Evening, 0),
        ];
        let decoded = decode(&encode(&observations).unwrap());
        assert!(decoded.is_clean());
        assert_eq!(decoded.value, observations);
    }

    #[test]
    fn test_decode_empty_input() {
        let decoded = decode(b"");
        assert!(decoded.value.is_empty());
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_decode_legacy_headers() {
        let csv = "data,dia_da_semana,turno,quantidade_pessoas\n\
                   2025-06-02,segunda-feira,Manhã,12\n\
                   2025-06-04 00:00:00,quarta-feira,Noite,80.0\n";
        let decoded = decode(csv.as_bytes());
        assert!(decoded.is_clean(), "{:?}", decoded.warnings);
        assert_eq!(decoded.value.len(), 2);
        assert_eq!(decoded.value[1].date(), date(2025, 6, 4));
        assert_eq!(decoded.value[1].weekday(), Weekday::Wednesday);
        assert_eq!(decoded.value[1].headcount(), 80);
    }

    #[test]
    fn test_decode_ignores_stale_weekday_column() {
        // The weekday column claims Friday but the date is a Monday
        let csv = "date,weekday,shift,headcount\n2025-06-02,sexta-feira,Tarde,5\n";
        let decoded = decode(csv.as_bytes());
        assert_eq!(decoded.value[0].weekday(), Weekday::Monday);
    }

    #[test]
    fn test_decode_without_weekday_column() {
        let csv = "date,shift,headcount,note\n2025-06-02,Tarde,5,rainy\n";
        let decoded = decode(csv.as_bytes());
        assert!(decoded.is_clean());
        assert_eq!(decoded.value.len(), 1);
    }

    #[test]
    fn test_decode_drops_unparseable_dates_with_warning() {
        let csv = "date,weekday,shift,headcount\n\
                   2025-06-02,segunda-feira,Manhã,10\n\
                   garbage,,Manhã,10\n\
                   2025-06-03,terça-feira,Manhã,20\n";
        let decoded = decode(csv.as_bytes());
        assert_eq!(decoded.value.len(), 2);
        assert_eq!(
            decoded.warnings,
            vec![PersistenceWarning::UnparseableDate {
                line: 3,
                value: "garbage".to_string()
            }]
        );
    }

    #[test]
    fn test_decode_drops_bad_shift_and_headcount() {
        let csv = "date,weekday,shift,headcount\n\
                   2025-06-02,,Madrugada,10\n\
                   2025-06-02,,Manhã,-4\n\
                   2025-06-02,,Tarde,7\n";
        let decoded = decode(csv.as_bytes());
        assert_eq!(decoded.value.len(), 1);
        assert_eq!(decoded.warnings.len(), 2);
        assert!(decoded
            .warnings
            .iter()
            .all(|w| matches!(w, PersistenceWarning::MalformedRow { .. })));
    }

    #[test]
    fn test_decode_missing_required_column() {
        let csv = "date,weekday,headcount\n2025-06-02,segunda-feira,10\n";
        let decoded = decode(csv.as_bytes());
        assert!(decoded.value.is_empty());
        assert!(matches!(
            decoded.warnings.as_slice(),
            [PersistenceWarning::Unreadable(_)]
        ));
    }

    #[test]
    fn test_parse_headcount() {
        assert_eq!(parse_headcount("12"), Some(12));
        assert_eq!(parse_headcount("12.0"), Some(12));
        assert_eq!(parse_headcount("12.5"), None);
        assert_eq!(parse_headcount("-1"), None);
        assert_eq!(parse_headcount(""), None);
    }
}
