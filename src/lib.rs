//! HTTP(S) endpoint monitor with edge-triggered email alerts.

pub mod alert;
pub mod checker;
pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod target;

pub use config::SentryConfig;
pub use lifecycle::Shutdown;
pub use monitor::Monitor;
