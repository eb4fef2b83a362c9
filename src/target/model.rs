//! Resolved target model and per-target runtime state.
//!
//! # States
//! - Schedule: `Due` / `NotDue`, decided by a wall-clock comparison
//! - Health: healthy (`true`) / failing (`false`), starting optimistic
//!
//! # State Transitions
//! ```text
//! NotDue → Due: now > next_check
//! Due → NotDue: reset_run_time() advances next_check by one interval
//! Healthy ↔ Failing: status code membership in return_codes flips
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Immutable configuration of a resolved target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSettings {
    pub name: String,
    pub url: String,
    /// Interval literal as written in the configuration.
    pub check_interval: String,
    #[serde(skip)]
    pub interval: Duration,
    pub follow_redirects: bool,
    pub return_codes: BTreeSet<u16>,
    pub from_email: Option<String>,
    pub alert_email_list: Vec<String>,
}

impl TargetSettings {
    /// Return true if `status` is one of the acceptable codes.
    pub fn is_status_valid(&self, status: u16) -> bool {
        self.return_codes.contains(&status)
    }
}

/// When a target is next eligible for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub interval: Duration,
    pub next_check: DateTime<Utc>,
}

impl Schedule {
    pub fn new(interval: Duration, next_check: DateTime<Utc>) -> Self {
        Self {
            interval,
            next_check,
        }
    }

    /// Due iff `now` is strictly after the scheduled instant.
    pub fn needs_check(&self, now: DateTime<Utc>) -> bool {
        now > self.next_check
    }

    /// Advance the next check by one interval from its previous value.
    ///
    /// Never re-anchors on "now": a target that has fallen behind stays due
    /// until it catches up.
    pub fn reset_run_time(&mut self) {
        let step = TimeDelta::from_std(self.interval).unwrap_or(TimeDelta::MAX);
        self.next_check = self
            .next_check
            .checked_add_signed(step)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
}

/// Direction of a health flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Healthy → failing.
    Failed,
    /// Failing → healthy.
    Recovered,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Failed => "offline",
            Transition::Recovered => "online",
        }
    }
}

/// Mutable outcome of the most recent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetState {
    /// Last observed HTTP status, 0 when the request failed at transport level.
    pub last_return_code: u16,
    pub current_state: bool,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            last_return_code: 0,
            current_state: true,
        }
    }
}

impl TargetState {
    /// Record a check result and report an edge, if any.
    pub fn record(&mut self, status: u16, valid: bool) -> Option<Transition> {
        let previous = self.current_state;
        self.last_return_code = status;
        self.current_state = valid;

        match (previous, valid) {
            (true, false) => Some(Transition::Failed),
            (false, true) => Some(Transition::Recovered),
            _ => None,
        }
    }
}

/// A fully resolved target: settings plus its schedule and health state.
#[derive(Debug, Clone)]
pub struct Target {
    pub settings: Arc<TargetSettings>,
    pub schedule: Schedule,
    pub state: TargetState,
}

impl Target {
    pub fn new(settings: TargetSettings, next_check: DateTime<Utc>) -> Self {
        let schedule = Schedule::new(settings.interval, next_check);
        Self {
            settings: Arc::new(settings),
            schedule,
            state: TargetState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }
}
