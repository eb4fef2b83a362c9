//! reqwest-backed status checker.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};

use crate::checker::{CheckError, StatusChecker};

/// Checker holding one client per redirect policy.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    following: Client,
    strict: Client,
}

impl HttpChecker {
    /// Build a checker that identifies as `user_agent` and gives up after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CheckError> {
        let following = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(Policy::default())
            .build()
            .map_err(CheckError::Client)?;

        let strict = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(Policy::custom(|attempt| attempt.error("redirects not allowed")))
            .build()
            .map_err(CheckError::Client)?;

        Ok(Self { following, strict })
    }
}

#[async_trait]
impl StatusChecker for HttpChecker {
    async fn check(&self, method: Method, url: &str, follow_redirects: bool) -> Result<u16, CheckError> {
        let client = if follow_redirects { &self.following } else { &self.strict };

        let response = client
            .request(method, url)
            .send()
            .await
            .map_err(|e| {
                if !follow_redirects && e.is_redirect() {
                    CheckError::RedirectNotAllowed { url: url.to_string() }
                } else if e.is_timeout() {
                    CheckError::Timeout { url: url.to_string() }
                } else if e.is_builder() {
                    CheckError::InvalidRequest(e)
                } else {
                    CheckError::Transport(e)
                }
            })?;

        Ok(response.status().as_u16())
    }
}
