//! Rendering of observations, schedules and weekly summaries for the CLI
//!
//! Text tables for people, JSON for machines, CSV for spreadsheets.

use crate::aggregate::{ScheduleEntry, WeeklySummary};
use crate::cli::OutputFormat;
use crate::observation::{Observation, DATE_FORMAT};
use crate::report::entries_csv;
use crate::store::encode;
use anyhow::{Context, Result};
use std::fmt::Write;

/// Insight line for the busiest slot
pub fn busiest_line(summary: &WeeklySummary) -> Option<String> {
    summary.busiest_slot.as_ref().map(|slot| {
        format!(
            "Turno mais movimentado: {} - {} com média de {:.0} pessoas",
            slot.weekday, slot.shift, slot.average_headcount
        )
    })
}

/// Insight line for the weakest day
pub fn weakest_line(summary: &WeeklySummary) -> Option<String> {
    summary
        .weakest_day
        .map(|day| format!("Dia mais fraco da semana: {}", day))
}

pub const NOT_ENOUGH_DATA: &str = "Não há dados suficientes para gerar o relatório semanal.";

fn schedule_table(entries: &[ScheduleEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:<6} {:>8} {:>13}",
        "Dia da semana", "Turno", "Média", "Funcionários"
    );
    let _ = writeln!(out, "{}", "-".repeat(45));
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<15} {:<6} {:>8.1} {:>13}",
            entry.weekday.label(),
            entry.shift.label(),
            entry.average_headcount,
            entry.recommended_staff
        );
    }
    out
}

/// Render the recommended schedule
pub fn render_schedule(entries: &[ScheduleEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                Ok("Nenhum dado registrado ainda.\n".to_string())
            } else {
                Ok(schedule_table(entries))
            }
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(entries).context("Failed to serialize schedule")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => {
            let bytes = entries_csv(entries).context("Failed to encode schedule")?;
            String::from_utf8(bytes).context("Schedule CSV is not UTF-8")
        }
    }
}

/// Render the weekly summary with its insights
pub fn render_summary(summary: &WeeklySummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "Relatório semanal: {} a {}",
                summary.week_start.format(DATE_FORMAT),
                summary.week_end.format(DATE_FORMAT)
            );
            if summary.is_empty() {
                let _ = writeln!(out, "{}", NOT_ENOUGH_DATA);
                return Ok(out);
            }
            out.push('\n');
            out.push_str(&schedule_table(&summary.entries));
            out.push('\n');
            for line in [busiest_line(summary), weakest_line(summary)].into_iter().flatten() {
                let _ = writeln!(out, "{}", line);
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(summary).context("Failed to serialize weekly summary")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => {
            let bytes = entries_csv(&summary.entries).context("Failed to encode weekly summary")?;
            String::from_utf8(bytes).context("Weekly summary CSV is not UTF-8")
        }
    }
}

/// Render a list of observations
pub fn render_observations(observations: &[Observation], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "{:<10} {:<15} {:<6} {:>8}",
                "Data", "Dia da semana", "Turno", "Pessoas"
            );
            let _ = writeln!(out, "{}", "-".repeat(42));
            for obs in observations {
                let _ = writeln!(
                    out,
                    "{:<10} {:<15} {:<6} {:>8}",
                    obs.date().format(DATE_FORMAT),
                    obs.weekday().label(),
                    obs.shift().label(),
                    obs.headcount()
                );
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(observations).context("Failed to serialize observations")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => {
            let bytes = encode(observations).context("Failed to encode observations")?;
            String::from_utf8(bytes).context("Observation CSV is not UTF-8")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{schedule, weekly_summary};
    use crate::observation::Shift;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Observation> {
        vec![
            Observation::new(date(2025, 6, 2), Shift::Morning, 10),
            Observation::new(date(2025, 6, 3), Shift::Morning, 80),
            Observation::new(date(2025, 6, 3), Shift::Evening, 30),
        ]
    }

    #[test]
    fn test_render_schedule_text() {
        let text = render_schedule(&schedule(&sample()), OutputFormat::Text).unwrap();
        assert!(text.contains("Funcionários"));
        assert!(text.contains("terça-feira"));
        assert!(text.contains("80.0"));
    }

    #[test]
    fn test_render_empty_schedule_text() {
        let text = render_schedule(&[], OutputFormat::Text).unwrap();
        assert!(text.contains("Nenhum dado"));
    }

    #[test]
    fn test_render_schedule_json() {
        let json = render_schedule(&schedule(&sample()), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["weekday"], "segunda-feira");
        assert_eq!(value[0]["shift"], "Manhã");
        assert_eq!(value[1]["recommended_staff"], 3);
    }

    #[test]
    fn test_render_summary_text_with_insights() {
        let summary = weekly_summary(&sample(), date(2025, 6, 11));
        let text = render_summary(&summary, OutputFormat::Text).unwrap();
        assert!(text.contains("2025-06-02 a 2025-06-08"));
        assert!(text.contains("Turno mais movimentado: terça-feira - Manhã com média de 80 pessoas"));
        assert!(text.contains("Dia mais fraco da semana: quarta-feira"));
    }

    #[test]
    fn test_render_summary_text_empty() {
        let summary = weekly_summary(&sample(), date(2025, 7, 1));
        let text = render_summary(&summary, OutputFormat::Text).unwrap();
        assert!(text.contains(NOT_ENOUGH_DATA));
    }

    #[test]
    fn test_render_summary_json_nulls_when_empty() {
        let summary = weekly_summary(&[], date(2025, 6, 11));
        let json = render_summary(&summary, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["busiest_slot"].is_null());
        assert!(value["weakest_day"].is_null());
        assert_eq!(value["week_start"], "2025-06-02");
        assert_eq!(value["entries"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_render_observations_csv() {
        let csv = render_observations(&sample(), OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("date,weekday,shift,headcount\n"));
        assert_eq!(csv.lines().count(), 4);
    }
}
