//! Typed errors for product extraction.
//!
//! Per-source misses inside a fallback chain are not errors: they are
//! `None` and the chain moves on. Only the outcomes a caller has to act on
//! surface as values of these enums.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::strategies::StrategyKind;

/// The two fields a record cannot exist without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Name,
    Price,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Price => f.write_str("price"),
        }
    }
}

/// A single GET failed. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {secs}s")]
    Timeout {
        secs: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("server answered with status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A numeral token could not be turned into an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a numeric amount: {token:?}")]
pub struct NumericParseError {
    pub token: String,
}

/// A structured-data block that is not valid JSON. Recovered by skipping the block.
#[derive(Debug, Error)]
#[error("malformed structured-data block #{index}: {source}")]
pub struct ParseError {
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Raised by a strategy whose fallback chains ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("could not find product name")]
    MissingName,

    #[error("could not find product price")]
    MissingPrice,

    /// Generic strategy only: the site is not supported yet.
    #[error("could not find product {missing}; this website might not be supported yet")]
    UnsupportedSite { missing: RequiredField },
}

impl StrategyError {
    /// Which required field was absent.
    pub fn missing_field(&self) -> RequiredField {
        match self {
            Self::MissingName => RequiredField::Name,
            Self::MissingPrice => RequiredField::Price,
            Self::UnsupportedSite { missing } => *missing,
        }
    }
}

/// Everything `Extractor::extract` can fail with. Always names the URL.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("error processing {domain} ({strategy} strategy): {source}")]
    Strategy {
        url: String,
        domain: String,
        strategy: StrategyKind,
        #[source]
        source: StrategyError,
    },

    /// The extraction task of a batch panicked or was cancelled.
    #[error("extraction task for {url} did not complete: {source}")]
    Task {
        url: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ExtractionError {
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Fetch { url, .. }
            | Self::Strategy { url, .. }
            | Self::Task { url, .. } => url,
        }
    }

    /// True when the generic strategy gave up, as opposed to a known site breaking.
    pub fn is_unsupported_site(&self) -> bool {
        matches!(
            self,
            Self::Strategy {
                source: StrategyError::UnsupportedSite { .. },
                ..
            }
        )
    }
}

/// Bad configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be one of {expected}, got {value:?}")]
    InvalidChoice {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}
