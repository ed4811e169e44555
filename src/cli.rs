//! CLI argument parsing for escala

use crate::observation::{parse_date, Shift};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "escala")]
#[command(version)]
#[command(
    about = "Shift headcount records and staffing recommendations for a single store",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file (default: ./escala.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Observation store, overrides the configured data_file
    #[arg(long = "data-file", global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE", value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record the headcount observed in one shift
    Record {
        /// Observation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Shift: Manhã, Tarde or Noite (morning, afternoon, evening)
        #[arg(long, value_parser = parse_shift)]
        shift: Shift,

        /// Number of people observed
        #[arg(long)]
        headcount: u32,
    },

    /// Recommended staff per weekday and shift over the full history
    Schedule {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Summary of the last completed Monday-Sunday week
    Report {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Observations from the last N days
    Recent {
        /// Window in days (default from configuration)
        #[arg(long)]
        days: Option<u32>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Normalized CSV of every valid observation
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Bar chart of mean headcount per weekday and shift (SVG)
    Chart {
        /// Write to this file instead of the configured chart_file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Single HTML page with chart, schedule and weekly report
    Dashboard {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn parse_shift(s: &str) -> Result<Shift, String> {
    s.parse::<Shift>().map_err(|e| e.to_string())
}

fn parse_today(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_record() {
        let cli = Cli::parse_from([
            "escala",
            "record",
            "--date",
            "2025-06-02",
            "--shift",
            "manha",
            "--headcount",
            "12",
        ]);
        match cli.command {
            Command::Record {
                date,
                shift,
                headcount,
            } => {
                assert_eq!(date.as_deref(), Some("2025-06-02"));
                assert_eq!(shift, Shift::Morning);
                assert_eq!(headcount, 12);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_record_date_is_optional() {
        let cli = Cli::parse_from(["escala", "record", "--shift", "Noite", "--headcount", "3"]);
        assert!(matches!(cli.command, Command::Record { date: None, .. }));
    }

    #[test]
    fn test_cli_rejects_unknown_shift() {
        let result = Cli::try_parse_from(["escala", "record", "--shift", "madrugada", "--headcount", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_negative_headcount() {
        let result = Cli::try_parse_from(["escala", "record", "--shift", "Tarde", "--headcount", "-4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "escala",
            "schedule",
            "--format",
            "json",
            "--today",
            "2025-06-11",
            "--data-file",
            "x.csv",
            "--debug",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2025, 6, 11));
        assert_eq!(cli.data_file, Some(PathBuf::from("x.csv")));
        assert!(matches!(
            cli.command,
            Command::Schedule {
                format: OutputFormat::Json
            }
        ));
    }

    #[test]
    fn test_cli_invalid_today() {
        let result = Cli::try_parse_from(["escala", "--today", "11/06/2025", "report"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["escala"]).is_err());
    }

    #[test]
    fn test_cli_recent_days_default_none() {
        let cli = Cli::parse_from(["escala", "recent"]);
        assert!(matches!(
            cli.command,
            Command::Recent {
                days: None,
                format: OutputFormat::Text
            }
        ));
    }
}
