//! Validate the SID of an ICAO flight plan message.
//!
//! Usage:
//!   vfpc-check [RULES] [--server URL] < plan.txt
//!
//! The result line goes to stderr as `Result for <callsign>: <trail>`, so
//! callers can rely on the exit status alone. The exit status is the outcome
//! code (0 on success), or 101 when the plan could not be checked at all.
//! With `--json` a JSON report is printed to stdout instead.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vfpc_cli::{check_settled, read_message, result_line, wait_for_datetime, PollBackoff};
use vfpc_core::{Checker, IcaoFlightPlan, Report, StaticSource};
use vfpc_source::{LiveSource, SourceConfig};

const FAILURE: u8 = 101;

#[derive(Parser, Debug)]
#[command(author, version, about = "Check a flight plan against SID departure rules")]
struct Args {
    /// Airport rule document to check against instead of the rule server
    rules: Option<PathBuf>,

    /// Rule server URL (defaults to VFPC_SOURCE_URL or the public server)
    #[arg(long, conflicts_with = "rules")]
    server: Option<String>,

    /// Override the engine type code of the filed aircraft type
    #[arg(long)]
    engine_type: Option<char>,

    /// Override the aircraft type code of the filed aircraft type
    #[arg(long)]
    aircraft_type: Option<char>,

    /// Seconds to wait for the rule server before giving up
    #[arg(long, default_value_t = 30)]
    wait_secs: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(report) => ExitCode::from(report.outcome.code()),
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("vfpc-check: {err:#}");
            ExitCode::from(FAILURE)
        }
    }
}

fn run(args: Args) -> Result<Report> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vfpc_cli=info".parse()?),
        )
        .init();

    let message = read_message(io::stdin().lock()).context("failed to read flight plan")?;
    let fp = IcaoFlightPlan::parse(&message).context("failed to parse flight plan")?;
    let engine_type = args.engine_type.unwrap_or(fp.plan.engine_type);
    let aircraft_type = args.aircraft_type.unwrap_or(fp.plan.aircraft_type);
    let fp = fp.with_type_codes(engine_type, aircraft_type);

    tracing::info!(callsign = %fp.callsign, aircraft = %fp.aircraft, "checking flight plan");

    let report = match &args.rules {
        Some(path) => {
            let source = StaticSource::from_path(path, fp.dof_eobt)
                .with_context(|| format!("failed to load rules from {}", path.display()))?;
            Checker::new(&source).check(&fp)
        }
        None => check_live(&args, &fp)?,
    };

    print_report(&fp, &report, args.json)?;
    Ok(report)
}

fn check_live(args: &Args, fp: &IcaoFlightPlan) -> Result<Report> {
    let mut config = SourceConfig::from_env();
    if let Some(server) = &args.server {
        config.source_url = server.clone();
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let source = LiveSource::new(&config, runtime.handle().clone())
        .context("failed to create rule client")?;
    tracing::info!(server = %source.base_url(), "using rule server");

    let budget = Duration::from_secs(args.wait_secs);
    let backoff =
        || PollBackoff::new(Duration::from_millis(100), Duration::from_secs(2), budget);

    let report = runtime.block_on(async {
        wait_for_datetime(&source, backoff()).await;
        check_settled(&Checker::new(&source), fp, backoff()).await
    });

    Ok(report)
}

fn print_report(fp: &IcaoFlightPlan, report: &Report, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "callsign": fp.callsign,
            "outcome": report.outcome,
            "code": report.outcome.code(),
            "class": report.outcome.classification(),
            "trail": report.trail,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        eprintln!("{}", result_line(&fp.callsign, report));
    }
    Ok(())
}
