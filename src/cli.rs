//! Command-line flags.
//!
//! Every flag can also come from a `SENTRY_*` environment variable. Values
//! given here override the config file; boolean switches can only turn a
//! setting on.

use std::path::PathBuf;

use clap::Parser;

use crate::config::SentryConfig;

#[derive(Debug, Parser)]
#[command(name = "url-sentry", version)]
#[command(about = "An URL monitoring alerting service")]
#[command(long_about = "Watches http/s URLs for unexpected responses.")]
pub struct Cli {
    /// Path to a specific config file (default "./config.toml")
    #[arg(long, env = "SENTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to log file (default "/var/log/url-sentry.log")
    #[arg(short = 'l', long, env = "SENTRY_LOG_FILE")]
    pub log_file: Option<String>,

    /// Check the config for errors and exit
    #[arg(long)]
    pub check: bool,

    /// Run once and exit
    #[arg(short = 'o', long, env = "SENTRY_RUN_ONCE")]
    pub run_once: bool,

    /// Disable all outgoing email alerts, log alerts only
    #[arg(short = 'n', long, env = "SENTRY_NO_ALERTS")]
    pub no_alerts: bool,

    /// The SMTP server to send email through
    #[arg(short = 'x', long, env = "SENTRY_SMTP_SERVER")]
    pub smtp_server: Option<String>,

    /// The port to use for the SMTP server
    #[arg(short = 'r', long, env = "SENTRY_SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// Authenticate the SMTP server with this user
    #[arg(short = 'u', long, env = "SENTRY_SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// Authenticate the SMTP server with this password
    #[arg(short = 'w', long, env = "SENTRY_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Print logs to stdout instead of file
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Include debug statements in log output
    #[arg(short = 'D', long, hide = true)]
    pub debug: bool,
}

impl Cli {
    /// Layer the command-line values over a loaded config.
    pub fn apply_to(&self, config: &mut SentryConfig) {
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        config.run_once |= self.run_once;
        config.no_alerts |= self.no_alerts;

        if let Some(server) = &self.smtp_server {
            config.smtp.server = server.clone();
        }
        if let Some(port) = self.smtp_port {
            config.smtp.port = port;
        }
        if let Some(username) = &self.smtp_username {
            config.smtp.username = username.clone();
        }
        if let Some(password) = &self.smtp_password {
            config.smtp.password = password.clone();
        }
        if self.debug {
            config.observability.log_level = "debug".to_string();
        }
    }
}
