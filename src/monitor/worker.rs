//! Per-target worker task.
//!
//! # Responsibilities
//! - Own one target's health state for the whole run
//! - Run a check each time the scheduler signals
//! - Send the report back to the scheduler
//!
//! # Design Decisions
//! - Single writer: nothing else touches the target's state
//! - Checks for one target never overlap
//! - Exits when the signal channel closes

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::monitor::probe::{CheckReport, Prober};
use crate::target::{TargetSettings, TargetState};

pub struct Worker {
    settings: Arc<TargetSettings>,
    state: TargetState,
    prober: Arc<Prober>,
    signals: mpsc::Receiver<()>,
    reports: mpsc::Sender<CheckReport>,
}

impl Worker {
    pub fn new(
        settings: Arc<TargetSettings>,
        state: TargetState,
        prober: Arc<Prober>,
        signals: mpsc::Receiver<()>,
        reports: mpsc::Sender<CheckReport>,
    ) -> Self {
        Self {
            settings,
            state,
            prober,
            signals,
            reports,
        }
    }

    pub async fn run(mut self) -> TargetState {
        while self.signals.recv().await.is_some() {
            let report = self.prober.probe(&self.settings, &mut self.state).await;
            if self.reports.send(report).await.is_err() {
                break;
            }
        }
        tracing::debug!(name = %self.settings.name, "Worker stopped");
        self.state
    }
}
