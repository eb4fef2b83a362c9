//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of the process-wide settings (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Target tables are not checked here; each one is resolved on its own
//!   so a bad entry does not reject the file

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::SentryConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("smtp.server must not be empty")]
    EmptySmtpServer,

    #[error("smtp.port must be greater than 0")]
    ZeroSmtpPort,

    #[error("smtp.from is not a valid address: {0}")]
    InvalidSender(String),

    #[error("http.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("observability.metrics_address is not a socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &SentryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.smtp.server.trim().is_empty() {
        errors.push(ValidationError::EmptySmtpServer);
    }
    if config.smtp.port == 0 {
        errors.push(ValidationError::ZeroSmtpPort);
    }
    if lettre::Address::from_str(&config.smtp.from).is_err() {
        errors.push(ValidationError::InvalidSender(config.smtp.from.clone()));
    }
    if config.http.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
