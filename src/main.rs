use anyhow::{Context, Result};
use clap::Parser;
use escala::cli::{Cli, Command, OutputFormat};
use escala::config::EscalaConfig;
use escala::error::{Outcome, PersistenceWarning};
use escala::observation::DATE_FORMAT;
use escala::output::{render_observations, render_schedule, render_summary};
use escala::planner::StaffingPlanner;
use escala::store::write_atomic;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print advisories to stderr and hand back the value
fn report_warnings<T>(outcome: Outcome<T>) -> T {
    for warning in &outcome.warnings {
        eprintln!("aviso: {}", warning);
    }
    outcome.value
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let mut config = EscalaConfig::load(args.config.as_deref())?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }
    if let Command::Chart {
        output: Some(ref path),
    } = args.command
    {
        config.chart_file = path.clone();
    }
    tracing::debug!("configuration: {:?}", config);

    let mut store = config.store();
    if let Some(today) = args.today {
        store = store.with_today(today);
    }
    let reports = config.materializer();
    let planner = StaffingPlanner::new(&store, &reports);

    match args.command {
        Command::Record {
            date,
            shift,
            headcount,
        } => {
            let date = date.unwrap_or_else(|| store.today().format(DATE_FORMAT).to_string());
            let recorded = report_warnings(planner.record(&date, shift, headcount)?);
            println!("Registro salvo com sucesso!");
            println!();
            print!("{}", render_schedule(&recorded.schedule, OutputFormat::Text)?);
        }
        Command::Schedule { format } => {
            let entries = report_warnings(planner.schedule());
            print!("{}", render_schedule(&entries, format)?);
        }
        Command::Report { format } => {
            let summary = report_warnings(planner.weekly_report());
            print!("{}", render_summary(&summary, format)?);
        }
        Command::Recent { days, format } => {
            let days = days.unwrap_or(config.recent_days);
            let observations = report_warnings(store.recent(days));
            print!("{}", render_observations(&observations, format)?);
        }
        Command::Export { output } => {
            let bytes = report_warnings(store.export().context("Failed to encode observations")?);
            match output {
                Some(path) => {
                    write_atomic(&path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Exportado para {}", path.display());
                }
                None => std::io::stdout()
                    .write_all(&bytes)
                    .context("Failed to write export to stdout")?,
            }
        }
        Command::Chart { .. } => {
            let outcome = planner.chart();
            let write_failed = outcome
                .warnings
                .iter()
                .any(|w| matches!(w, PersistenceWarning::ArtifactWrite { .. }));
            report_warnings(outcome);
            if write_failed {
                anyhow::bail!("Failed to write chart to {}", config.chart_file.display());
            }
            eprintln!("Gráfico salvo em {}", config.chart_file.display());
        }
        Command::Dashboard { output } => {
            let html = report_warnings(planner.dashboard());
            write_atomic(&output, html.as_bytes())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            eprintln!("Painel salvo em {}", output.display());
        }
    }

    Ok(())
}
