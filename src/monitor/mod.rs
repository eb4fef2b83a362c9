//! Scheduler and monitor loop.
//!
//! # Data Flow
//! ```text
//! Run-once:
//!     for each due target → probe.rs (check, record, alert) → reset schedule
//!
//! Continuous:
//!     1s ticker
//!     → due targets get a "check now" signal (schedule reset on dispatch)
//!     → worker.rs task per target runs the probe
//!     → CheckReport sent back to the loop
//! ```
//!
//! # Design Decisions
//! - The loop owns every schedule; each worker owns its target's state
//! - A busy worker coalesces signals: at most one pending check per target
//! - Schedules advance from their previous value, never from "now"

pub mod probe;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};

use crate::target::{Schedule, Target};

pub use probe::{CheckReport, Prober};
pub use worker::Worker;

/// Scheduler resolution.
pub const TICK: Duration = Duration::from_secs(1);

/// How long in-flight checks get to finish after shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

const TIMESTAMP_FORMAT: &str = "%b %d, %Y %H:%M:%S UTC";

/// Owns the resolved targets and drives their checks.
pub struct Monitor {
    targets: Vec<Target>,
    prober: Arc<Prober>,
}

struct Slot {
    name: String,
    schedule: Schedule,
    signals: mpsc::Sender<()>,
}

impl Monitor {
    pub fn new(targets: Vec<Target>, prober: Prober) -> Self {
        Self {
            targets,
            prober: Arc::new(prober),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Check every due target exactly once, in order, then return.
    pub async fn run_once(&mut self) -> Vec<CheckReport> {
        self.run_once_at(Utc::now()).await
    }

    /// Run-once with an explicit clock reading for the due decision.
    pub async fn run_once_at(&mut self, now: DateTime<Utc>) -> Vec<CheckReport> {
        let mut reports = Vec::new();
        for target in self.targets.iter_mut() {
            if !target.schedule.needs_check(now) {
                continue;
            }
            reports.push(self.prober.probe(&target.settings, &mut target.state).await);
            target.schedule.reset_run_time();
            log_next_check(&target.settings.name, &target.schedule);
        }
        reports
    }

    /// Run until `shutdown` fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            targets = self.targets.len(),
            alerts_enabled = self.prober.alerts_enabled(),
            "Monitor starting"
        );

        let (report_tx, mut report_rx) = mpsc::channel(self.targets.len().max(1) * 2);
        let mut workers = JoinSet::new();
        let mut slots = Vec::with_capacity(self.targets.len());

        for target in self.targets {
            let (signal_tx, signal_rx) = mpsc::channel(1);
            let worker = Worker::new(
                target.settings.clone(),
                target.state,
                self.prober.clone(),
                signal_rx,
                report_tx.clone(),
            );
            workers.spawn(worker.run());
            slots.push(Slot {
                name: target.settings.name.clone(),
                schedule: target.schedule,
                signals: signal_tx,
            });
        }
        drop(report_tx);

        let mut ticker = time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    dispatch_due(&mut slots, Utc::now());
                }
                Some(report) = report_rx.recv() => {
                    tracing::debug!(
                        name = %report.target,
                        status = report.status,
                        healthy = report.healthy,
                        transition = ?report.transition,
                        "Check report received"
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!("Monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        drop(slots);
        drop(report_rx);
        let drained = time::timeout(SHUTDOWN_GRACE, async {
            while workers.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(remaining = workers.len(), "Checks still in flight at shutdown, aborting");
            workers.abort_all();
        }
        tracing::info!("Monitor stopped");
    }
}

/// Signal every due slot and advance its schedule. Returns how many were due.
fn dispatch_due(slots: &mut [Slot], now: DateTime<Utc>) -> usize {
    let mut due = 0;
    for slot in slots.iter_mut() {
        if !slot.schedule.needs_check(now) {
            continue;
        }
        due += 1;
        match slot.signals.try_send(()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!(name = %slot.name, "Previous check still pending, coalescing");
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::warn!(name = %slot.name, "Worker gone, skipping check");
            }
        }
        slot.schedule.reset_run_time();
        log_next_check(&slot.name, &slot.schedule);
    }
    due
}

fn log_next_check(name: &str, schedule: &Schedule) {
    tracing::debug!(
        name = %name,
        next_check = %schedule.next_check.format(TIMESTAMP_FORMAT),
        "Next check scheduled"
    );
}
