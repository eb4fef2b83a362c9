//! Email address normalization.

use std::str::FromStr;

use lettre::Address;

use crate::target::error::TargetError;

/// Trim, lower-case and shape-check a single address.
pub fn normalize_email(field: &'static str, raw: &str) -> Result<String, TargetError> {
    let candidate = raw.trim().to_lowercase();
    Address::from_str(&candidate)
        .map(|addr| addr.to_string())
        .map_err(|e| TargetError::EmailFormat {
            field,
            address: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Normalize every entry of an address list, preserving order.
pub fn normalize_email_list(field: &'static str, raw: &[String]) -> Result<Vec<String>, TargetError> {
    raw.iter().map(|addr| normalize_email(field, addr)).collect()
}
