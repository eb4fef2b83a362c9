//! Alerting subsystem.
//!
//! # Data Flow
//! ```text
//! Transition observed by the monitor
//!     → message.rs (compose subject/body/recipients)
//!     → alerts enabled? ── no → log only
//!     → AlertDispatcher::send (smtp.rs in production)
//! ```
//!
//! # Design Decisions
//! - Dispatch failures are logged by the caller, never retried
//! - The transport receives a fully formed message and the server settings

pub mod message;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

// Server settings are the `[smtp]` config section.
pub use crate::config::schema::SmtpConfig;
pub use message::compose_alert;
pub use smtp::SmtpDispatcher;

/// A fully composed alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub to: Vec<String>,
    pub from: String,
    pub body: String,
}

/// Errors raised while handing an alert to the transport.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Message has no recipients")]
    NoRecipients,

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Delivers composed alerts.
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn send(&self, message: &Message, server: &SmtpConfig) -> Result<(), DispatchError>;
}
