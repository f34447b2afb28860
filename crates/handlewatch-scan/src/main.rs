//! CLI entry point for the handlewatch handle scanner.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use handlewatch_core::events::{EventPayload, ScanEvent};
use handlewatch_probe::build_modules;

use handlewatch_scan::config::{load_scan_config, ScanConfig};
use handlewatch_scan::report::ScanReport;
use handlewatch_scan::target::resolve_handles;
use handlewatch_scan::{RiskScorer, ScanCoordinator};

#[derive(Parser)]
#[command(name = "handlewatch")]
#[command(about = "Check social-media handles for impersonation risk")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: handlewatch).
    #[arg(short, long, default_value = "handlewatch", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Scan one or more handles and print a JSON report.
    Scan {
        /// Handles to check, with or without a leading '@'.
        #[arg(required = true)]
        handles: Vec<String>,

        /// Maximum modules probing at once.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Deadline per handle, in seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Comma-separated modules to enable (e.g. github,twitter).
        #[arg(long, value_delimiter = ',')]
        modules: Option<Vec<String>>,
    },
    /// List the enabled probe modules.
    Modules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Scan {
            handles,
            concurrency,
            timeout,
            modules,
        } => {
            let mut config = load_scan_config(&cli.config)?;
            if let Some(c) = concurrency {
                config.max_concurrency = c;
            }
            if let Some(t) = timeout {
                config.timeout_secs = t;
            }
            if let Some(m) = modules {
                config.modules = m;
            }
            config.validate()?;

            let handles = resolve_handles(&handles)?;
            let report = run_scans(&config, &handles).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Modules => {
            let config = load_scan_config(&cli.config)?;
            for module in build_modules(&config.probe_settings(), &config.modules)? {
                println!("{:<12} {}", module.name(), module.description());
            }
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the report.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_scans(config: &ScanConfig, handles: &[String]) -> anyhow::Result<ScanReport> {
    let modules = build_modules(&config.probe_settings(), &config.modules)?;
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let events = tokio::spawn(log_events(events_rx));

    let coordinator = ScanCoordinator::new(modules).with_events(events_tx);
    let deadline = config.deadline();
    let mut sessions = Vec::with_capacity(handles.len());

    for handle in handles {
        match coordinator
            .run(handle, deadline, config.max_concurrency)
            .await
        {
            Ok(session) => sessions.push(session),
            Err(e) => {
                tracing::warn!(handle = %handle, error = %e, "Scan did not complete cleanly");
                match e.into_session() {
                    Some(session) => sessions.push(session),
                    None => return Err(anyhow::anyhow!("scan of {handle} could not start")),
                }
            }
        }
    }

    // Closing the sender lets the event logger drain and exit.
    drop(coordinator);
    let _ = tokio::time::timeout(Duration::from_secs(1), events).await;

    let scorer = RiskScorer::new(config.scoring.clone());
    let report = ScanReport::new(sessions, &scorer);
    tracing::info!(
        handles = handles.len(),
        findings = report.total_findings(),
        risk_score = report.risk_score,
        overall_severity = %report.overall_severity,
        "Report ready"
    );
    Ok(report)
}

async fn log_events(mut rx: mpsc::UnboundedReceiver<ScanEvent>) {
    while let Some(event) = rx.recv().await {
        match &event.payload {
            EventPayload::ScanStarted {
                target,
                module_count,
            } => {
                tracing::debug!(session_id = %event.session_id, target = %target, module_count, "scan.started");
            }
            EventPayload::ModuleCompleted { module, findings } => {
                tracing::debug!(session_id = %event.session_id, module = %module, findings, "module.completed");
            }
            EventPayload::ModuleFailed { module, error } => {
                tracing::debug!(session_id = %event.session_id, module = %module, error = %error, "module.failed");
            }
            EventPayload::ScanCompleted {
                findings,
                failures,
                duration_ms,
                deadline_exceeded,
            } => {
                tracing::debug!(
                    session_id = %event.session_id,
                    findings,
                    failures,
                    duration_ms,
                    deadline_exceeded,
                    "scan.completed"
                );
            }
        }
    }
}
