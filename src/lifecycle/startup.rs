//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve targets from the loaded configuration
//! - Build the checker, dispatcher and prober
//! - Hand back a ready-to-run monitor
//!
//! # Design Decisions
//! - Invalid defaults are fatal; an invalid target is skipped
//! - Collaborators can be injected for tests

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::alert::{AlertDispatcher, SmtpDispatcher};
use crate::checker::{CheckError, HttpChecker, StatusChecker, USER_AGENT};
use crate::config::SentryConfig;
use crate::monitor::{Monitor, Prober};
use crate::target::{resolve_targets, Target, TargetError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("default values invalid: {0}")]
    Defaults(#[from] TargetError),

    #[error("{0}")]
    Checker(#[from] CheckError),
}

/// Resolve every configured target.
pub fn load_targets(config: &SentryConfig) -> Result<Vec<Target>, StartupError> {
    let targets = resolve_targets(config.defaults.as_ref(), &config.targets)?;

    for target in &targets {
        tracing::debug!(
            settings = %serde_json::to_string(&*target.settings).unwrap_or_default(),
            "config: target"
        );
    }
    if targets.len() < config.targets.len() {
        tracing::warn!(
            configured = config.targets.len(),
            usable = targets.len(),
            "Some targets were skipped"
        );
    }
    if targets.is_empty() {
        tracing::warn!("No usable targets configured");
    }
    Ok(targets)
}

/// Build a monitor with the production checker and SMTP dispatcher.
pub fn build_monitor(config: &SentryConfig) -> Result<Monitor, StartupError> {
    let checker = HttpChecker::new(USER_AGENT, Duration::from_secs(config.http.timeout_secs))?;
    build_monitor_with(config, Arc::new(checker), Arc::new(SmtpDispatcher::new()))
}

/// Build a monitor around the given collaborators.
pub fn build_monitor_with(
    config: &SentryConfig,
    checker: Arc<dyn StatusChecker>,
    dispatcher: Arc<dyn AlertDispatcher>,
) -> Result<Monitor, StartupError> {
    let targets = load_targets(config)?;
    if config.no_alerts {
        tracing::debug!("config: no-alerts=true");
    }
    let prober = Prober::new(checker, dispatcher, config.smtp.clone(), !config.no_alerts);
    Ok(Monitor::new(targets, prober))
}
