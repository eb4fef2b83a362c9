//! One check of one target, including transition alerting.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqwest::Method;

use crate::alert::{compose_alert, AlertDispatcher, Message, SmtpConfig};
use crate::checker::StatusChecker;
use crate::observability::metrics;
use crate::target::{TargetSettings, TargetState, Transition};

/// Outcome of a single check.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub target: String,
    /// Observed status, 0 when no response was obtained.
    pub status: u16,
    pub healthy: bool,
    pub transition: Option<Transition>,
    /// Alert composed for the transition, if any.
    pub alert: Option<Message>,
    pub alert_delivered: bool,
    pub error: Option<String>,
}

/// Runs checks and fires alerts on health flips.
pub struct Prober {
    checker: Arc<dyn StatusChecker>,
    dispatcher: Arc<dyn AlertDispatcher>,
    smtp: SmtpConfig,
    alerts_enabled: bool,
}

impl Prober {
    pub fn new(
        checker: Arc<dyn StatusChecker>,
        dispatcher: Arc<dyn AlertDispatcher>,
        smtp: SmtpConfig,
        alerts_enabled: bool,
    ) -> Self {
        Self {
            checker,
            dispatcher,
            smtp,
            alerts_enabled,
        }
    }

    pub fn alerts_enabled(&self) -> bool {
        self.alerts_enabled
    }

    /// Check `settings` once and fold the result into `state`.
    pub async fn probe(&self, settings: &TargetSettings, state: &mut TargetState) -> CheckReport {
        let started = Instant::now();
        let (status, error) = match self
            .checker
            .check(Method::GET, &settings.url, settings.follow_redirects)
            .await
        {
            Ok(status) => (status, None),
            Err(e) => {
                tracing::error!(name = %settings.name, url = %settings.url, error = %e, "Error getting http status");
                (0, Some(e.to_string()))
            }
        };

        let healthy = settings.is_status_valid(status);
        if healthy {
            tracing::info!(name = %settings.name, state = "ok", status, "check");
        } else {
            tracing::info!(name = %settings.name, state = "err", status, "check");
        }
        metrics::record_check(&settings.name, healthy, started);

        let transition = state.record(status, healthy);
        let mut report = CheckReport {
            target: settings.name.clone(),
            status,
            healthy,
            transition,
            alert: None,
            alert_delivered: false,
            error,
        };

        if let Some(transition) = transition {
            let message = compose_alert(settings, state, transition, &self.smtp.from, Utc::now());
            report.alert_delivered = self.dispatch(&settings.name, transition, &message).await;
            report.alert = Some(message);
        }
        report
    }

    async fn dispatch(&self, target: &str, transition: Transition, message: &Message) -> bool {
        tracing::debug!(name = %target, direction = transition.as_str(), subject = %message.subject, "Sending alert");

        if !self.alerts_enabled {
            tracing::info!(name = %target, direction = transition.as_str(), "Alerts disabled, not sending");
            metrics::record_alert(target, transition, false);
            return false;
        }
        if message.to.is_empty() {
            tracing::warn!(name = %target, "No alert recipients configured");
            metrics::record_alert(target, transition, false);
            return false;
        }

        let delivered = match self.dispatcher.send(message, &self.smtp).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(name = %target, error = %e, "Failed to send alert");
                false
            }
        };
        metrics::record_alert(target, transition, delivered);
        delivered
    }
}
