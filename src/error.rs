//! # Forecast Errors
//!
//! Every fallible operation in the library returns [`ForecastError`]. The
//! variants follow the pipeline order: client-side validation first (before
//! any request is issued), then transport and API failures, then record
//! decoding.
//!
//! Missing fields inside an otherwise valid record are *not* errors. They
//! render as `None` in display attributes and as
//! [`FieldValue::Unavailable`](crate::forecast::FieldValue) in direct lookups.

use thiserror::Error;

/// Errors that can occur while building queries, fetching forecasts and
/// decoding forecast records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Field path is not part of the API field whitelist
    #[error("invalid field type: {0}")]
    InvalidField(String),

    /// Unit code is not one of `us`, `uk`, `eu`
    #[error("invalid unit type: {0}")]
    InvalidUnit(String),

    /// Connection failure or non-success HTTP status
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with an `error_response` payload
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// A forecast record (or the response envelope) has the wrong shape
    #[error("malformed forecast record: {0}")]
    MalformedRecord(String),

    /// Configuration file could not be read or written
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::Transport(err.to_string())
    }
}

/// Library result alias.
pub type Result<T> = std::result::Result<T, ForecastError>;
