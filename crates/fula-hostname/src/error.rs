//! Error types for the fula-hostname crate

use thiserror::Error;

/// Result type alias using `HostnameError`
pub type Result<T> = std::result::Result<T, HostnameError>;

/// Errors that can occur while classifying a request by its hostname.
///
/// None of these are surfaced to clients: the router absorbs them into a
/// lower-trust routing branch, a 404, or serving the request as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostnameError {
    /// Host header could not be split into host and port
    #[error("malformed host {host:?}: {reason}")]
    MalformedHost { host: String, reason: &'static str },

    /// Text is not a valid content identifier
    #[error("malformed content identifier {0:?}")]
    MalformedIdentifier(String),

    /// Content identifier could not be re-encoded
    #[error("cannot encode content identifier: {0}")]
    Encoding(String),

    /// A constructed redirect target failed validation
    #[error("unsafe redirect target {0:?}")]
    UnsafeRedirectTarget(String),

    /// The name resolver could not be reached
    #[error("name resolver unavailable: {0}")]
    ResolverUnavailable(String),
}

impl HostnameError {
    pub(crate) fn malformed_host(host: &str, reason: &'static str) -> Self {
        Self::MalformedHost {
            host: host.to_string(),
            reason,
        }
    }
}

impl From<cid::Error> for HostnameError {
    fn from(err: cid::Error) -> Self {
        HostnameError::Encoding(err.to_string())
    }
}
