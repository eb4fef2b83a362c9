//! url-sentry
//!
//! Watches http/s URLs for unexpected responses and emails when a target
//! goes offline or comes back online.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config ──▶ target (defaults + overrides merge)
//!                                   │
//!                                   ▼
//!                  ┌───────────── monitor ─────────────┐
//!                  │ 1s ticker → due? → worker/target  │
//!                  │     checker (HTTP GET)            │
//!                  │     state flip? → alert (SMTP)    │
//!                  └───────────────────────────────────┘
//!
//!   Cross-cutting: observability (logs, metrics), lifecycle (startup, signals)
//! ```

use clap::Parser;

use url_sentry::cli::Cli;
use url_sentry::config::{find_config, load_config, search_paths};
use url_sentry::lifecycle::{signals, startup, Shutdown};
use url_sentry::observability::logging::{init_logging, LogSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = find_config(cli.config.as_deref(), &search_paths())?;
    let mut config = load_config(&config_path)?;
    cli.apply_to(&mut config);

    let _log_guard = init_logging(&LogSettings {
        level: config.observability.log_level.clone(),
        verbose: cli.verbose,
        log_file: config.log_file.clone().into(),
    })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        file = %config_path.display(),
        "url-sentry starting"
    );
    tracing::debug!(
        host = %config.smtp.server,
        port = config.smtp.port,
        username = %config.smtp.username,
        "config: smtp"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            url_sentry::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let mut monitor = startup::build_monitor(&config)?;

    if cli.check {
        tracing::info!(targets = monitor.targets().len(), "Config file format checks out, exiting");
        if !cli.debug {
            tracing::info!("Use the --debug flag for more info");
        }
        return Ok(());
    }

    if config.run_once {
        let reports = monitor.run_once().await;
        tracing::info!(checked = reports.len(), "Run once complete");
    } else {
        let shutdown = Shutdown::new();
        let stop = shutdown.subscribe();
        signals::spawn_signal_listener(shutdown.clone());
        monitor.run(stop).await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
