// ── Core error types ──
//
// User-facing errors from crudboard-core. The `From<crudboard_api::Error>`
// impl folds transport failures into a small taxonomy: the request never
// got an answer, the answer was a non-2xx status, or the lookup after a
// successful fetch came up empty.

use thiserror::Error;

use crudboard_api::Resource;

use crate::fields::FieldError;
use crate::model::RecordId;
use crate::validation::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("Could not reach the {resource} service: {reason}")]
    Network { resource: Resource, reason: String },

    #[error("{resource} request timed out")]
    Timeout { resource: Resource },

    #[error("{resource} request failed with HTTP {status}")]
    HttpStatus { resource: Resource, status: u16 },

    #[error("Unexpected {resource} response: {message}")]
    Decode { resource: Resource, message: String },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("No {} with id {id}", .resource.singular())]
    NotFound { resource: Resource, id: RecordId },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    InvalidField(#[from] FieldError),

    #[error("Not in edit mode")]
    NotEditing,

    #[error("Nothing is loaded")]
    NothingLoaded,

    #[error("Operation cancelled: the view was closed")]
    Cancelled,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` when the target does not exist, whether the lookup
    /// missed locally or the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::HttpStatus { status: 404, .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` for failures that happened before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidField(_) | Self::NotEditing | Self::NothingLoaded
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<crudboard_api::Error> for CoreError {
    fn from(err: crudboard_api::Error) -> Self {
        match err {
            crudboard_api::Error::Network { resource, source } => {
                if source.is_timeout() {
                    Self::Timeout { resource }
                } else {
                    Self::Network {
                        resource,
                        reason: source.to_string(),
                    }
                }
            }
            crudboard_api::Error::HttpStatus {
                resource, status, ..
            } => Self::HttpStatus { resource, status },
            crudboard_api::Error::Deserialization {
                resource, message, ..
            } => Self::Decode { resource, message },
            crudboard_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            crudboard_api::Error::ClientBuild(e) => Self::Config {
                message: format!("Cannot build HTTP client: {e}"),
            },
            crudboard_api::Error::Encode(e) => {
                Self::Internal(format!("Request encoding failed: {e}"))
            }
        }
    }
}
