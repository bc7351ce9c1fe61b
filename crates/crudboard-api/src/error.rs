use thiserror::Error;

use crate::resource::Resource;

/// Top-level error type for the `crudboard-api` crate.
///
/// Covers every way a single request can fail: the transport never
/// produced a response, the response carried a non-2xx status, or the
/// body could not be decoded. `crudboard-core` maps these into
/// domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("Request to {resource} failed: {source}")]
    Network {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Response ────────────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    #[error("{resource} request failed with HTTP {status}")]
    HttpStatus {
        resource: Resource,
        status: u16,
        /// Truncated response body, for diagnostics.
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx response whose body did not match the expected shape.
    #[error("Could not decode {resource} response: {message}")]
    Deserialization {
        resource: Resource,
        message: String,
        body: String,
    },

    /// The request payload could not be encoded as JSON.
    #[error("Could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status carried by this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Network { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The collection the failed request targeted, if known.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Self::Network { resource, .. }
            | Self::HttpStatus { resource, .. }
            | Self::Deserialization { resource, .. } => Some(*resource),
            _ => None,
        }
    }

    /// Returns `true` if the server reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying by hand.
    ///
    /// Nothing in this crate retries automatically.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { source, .. } => source.is_timeout() || source.is_connect(),
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if the request exceeded the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { source, .. } if source.is_timeout())
    }
}
