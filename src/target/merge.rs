//! Layering of target configuration.
//!
//! # Data Flow
//! ```text
//! defaults table → RawTarget → resolve_base() → base Target
//! target table   → RawTarget ─┐
//!                 base Target ─┴→ merge() → resolved Target
//! ```
//!
//! # Merge Rules
//! - Scalars (name, url, interval, from_email): override wins when present and non-empty
//! - Lists (return_codes, alert_email): replaced wholesale when the key is present
//! - follow_redirects: override wins whenever the key is present, even when `false`;
//!   otherwise inherited. The base layer defaults it to `true`.

use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use toml::Value;
use url::Url;

use crate::target::email::{normalize_email, normalize_email_list};
use crate::target::error::TargetError;
use crate::target::model::{Target, TargetSettings};
use crate::target::raw::RawTarget;

/// Resolve the defaults layer.
pub fn resolve_base(raw: &Value) -> Result<Target, TargetError> {
    resolve_base_at(raw, Utc::now())
}

/// Resolve the defaults layer with an explicit clock reading.
///
/// The first check is scheduled at `now` truncated to the second.
pub fn resolve_base_at(raw: &Value, now: DateTime<Utc>) -> Result<Target, TargetError> {
    let raw = RawTarget::from_value(raw)?;

    let name = raw.name.unwrap_or_default();
    let check_interval = raw.interval.unwrap_or_default();
    let interval = parse_interval(&name, &check_interval)?;
    let from_email = non_empty(raw.from_email)
        .map(|addr| normalize_email("from_email", &addr))
        .transpose()?;
    let alert_email_list =
        normalize_email_list("alert_email", &raw.alert_email.unwrap_or_default())?;

    let settings = TargetSettings {
        name,
        url: raw.url.unwrap_or_default(),
        check_interval,
        interval,
        follow_redirects: raw.follow_redirects.unwrap_or(true),
        return_codes: raw.return_codes.unwrap_or_default().into_iter().collect(),
        from_email,
        alert_email_list,
    };

    Ok(Target::new(settings, now.trunc_subsecs(0)))
}

/// Layer `raw` over an already resolved `base`.
pub fn merge(base: &Target, raw: &Value) -> Result<Target, TargetError> {
    merge_at(base, raw, Utc::now())
}

/// Layer `raw` over `base` with an explicit clock reading.
pub fn merge_at(base: &Target, raw: &Value, now: DateTime<Utc>) -> Result<Target, TargetError> {
    let raw = RawTarget::from_value(raw)?;
    let parent = &base.settings;

    let url = override_scalar(raw.url, &parent.url);
    let mut name = override_scalar(raw.name, &parent.name);
    if name.is_empty() {
        name = url.clone();
    }
    validate_url(&name, &url)?;

    let check_interval = override_scalar(raw.interval, &parent.check_interval);
    let interval = parse_interval(&name, &check_interval)?;

    let from_email = match non_empty(raw.from_email) {
        Some(addr) => Some(normalize_email("from_email", &addr)?),
        None => parent.from_email.clone(),
    };

    let alert_email_list = match raw.alert_email {
        Some(list) => normalize_email_list("alert_email", &list)?,
        None => parent.alert_email_list.clone(),
    };

    let return_codes = match raw.return_codes {
        Some(codes) => codes.into_iter().collect(),
        None => parent.return_codes.clone(),
    };

    let settings = TargetSettings {
        name,
        url,
        check_interval,
        interval,
        follow_redirects: raw.follow_redirects.unwrap_or(parent.follow_redirects),
        return_codes,
        from_email,
        alert_email_list,
    };

    Ok(Target::new(settings, now))
}

/// Resolve one target entry against a defaults entry.
pub fn resolve(defaults: &Value, target: &Value) -> Result<Target, TargetError> {
    let base = resolve_base(defaults)?;
    merge(&base, target)
}

/// Resolve every target entry against the defaults.
///
/// Invalid defaults fail the whole list. An invalid target entry is logged
/// and skipped; the remaining entries are still resolved.
pub fn resolve_targets(defaults: Option<&Value>, targets: &[Value]) -> Result<Vec<Target>, TargetError> {
    let empty = Value::Table(Default::default());
    let base = resolve_base(defaults.unwrap_or(&empty)).map_err(|e| {
        tracing::error!(error = %e, "Default values invalid");
        e
    })?;

    let mut resolved = Vec::with_capacity(targets.len());
    for (index, raw) in targets.iter().enumerate() {
        match merge(&base, raw) {
            Ok(target) => resolved.push(target),
            Err(e) => {
                tracing::error!(index, error = %e, "Invalid values for target, skipping");
            }
        }
    }
    Ok(resolved)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn override_scalar(value: Option<String>, parent: &str) -> String {
    non_empty(value).unwrap_or_else(|| parent.to_string())
}

fn parse_interval(target: &str, literal: &str) -> Result<Duration, TargetError> {
    if literal.trim().is_empty() {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(literal.trim()).map_err(|source| TargetError::IntervalParse {
        target: target.to_string(),
        source,
    })
}

fn validate_url(target: &str, url: &str) -> Result<(), TargetError> {
    if url.trim().is_empty() {
        return Err(TargetError::MissingUrl {
            target: target.to_string(),
        });
    }
    let parsed = Url::parse(url).map_err(|e| TargetError::InvalidUrl {
        target: target.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TargetError::InvalidUrl {
            target: target.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
