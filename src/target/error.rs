//! Errors raised while resolving target configuration.

use thiserror::Error;

/// Errors that can occur while decoding or merging a target entry.
///
/// Every variant is scoped to a single target: the caller logs it and moves on
/// to the next entry.
#[derive(Debug, Error)]
pub enum TargetError {
    /// The raw entry is not a key/value table.
    #[error("target is an unknown format: expected a table, got {found}")]
    ConfigFormat { found: &'static str },

    /// A declared field holds a value of the wrong shape.
    #[error("error decoding field '{field}': {reason}")]
    FieldDecode { field: &'static str, reason: String },

    /// The interval literal could not be parsed as a duration.
    #[error("error parsing interval target={target}: {source}")]
    IntervalParse {
        target: String,
        #[source]
        source: humantime::DurationError,
    },

    /// An email field failed normalization.
    #[error("email format not valid for '{field}': {address} ({reason})")]
    EmailFormat {
        field: &'static str,
        address: String,
        reason: String,
    },

    /// A target was resolved without a URL.
    #[error("target '{target}' has no url")]
    MissingUrl { target: String },

    /// The target URL is not a valid absolute URL.
    #[error("invalid url for target '{target}': {reason}")]
    InvalidUrl { target: String, reason: String },
}
