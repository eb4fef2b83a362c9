//! Configuration schema definitions.
//!
//! This module defines the configuration file structure for the monitor.
//! All types derive `Deserialize` for loading from config files.
//! Target tables are kept as raw values; `crate::target` decodes them.

use serde::Deserialize;

/// Root configuration for the monitor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    /// Log file path. A directory gets `url-sentry.log` appended.
    pub log_file: String,

    /// Disable outgoing email; alerts are composed and logged only.
    pub no_alerts: bool,

    /// Check every target once and exit.
    pub run_once: bool,

    /// Outbound mail settings.
    pub smtp: SmtpConfig,

    /// Probe request settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Values every target inherits unless it overrides them.
    pub defaults: Option<toml::Value>,

    /// Monitored endpoints.
    pub targets: Vec<toml::Value>,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            log_file: "/var/log/url-sentry.log".to_string(),
            no_alerts: false,
            run_once: false,
            smtp: SmtpConfig::default(),
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
            defaults: None,
            targets: Vec::new(),
        }
    }
}

/// SMTP server the alert dispatcher delivers through.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP host name.
    pub server: String,

    /// SMTP port.
    pub port: u16,

    /// Authenticate with this user (empty = no auth).
    pub username: String,

    /// Password for `username`.
    pub password: String,

    /// Sender used when a target has no `from_email`.
    pub from: String,

    /// Upgrade the connection with STARTTLS.
    pub starttls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 25,
            username: String::new(),
            password: String::new(),
            from: "url-sentry@localhost".to_string(),
            starttls: false,
        }
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .field("starttls", &self.starttls)
            .finish()
    }
}

/// Probe request configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
