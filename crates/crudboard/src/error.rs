//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use crudboard_config::ConfigError;
use crudboard_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the {resource} service")]
    #[diagnostic(
        code(crudboard::connection_failed),
        help(
            "Check that the service is running and the base URL is right.\n\
             Reason: {reason}\n\
             Try: crudboard --base-url <URL> users list"
        )
    )]
    ConnectionFailed { resource: String, reason: String },

    #[error("{resource} request timed out")]
    #[diagnostic(
        code(crudboard::timeout),
        help("Increase the timeout with --timeout or check service responsiveness.")
    )]
    Timeout { resource: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(crudboard::not_found),
        help("Run: crudboard {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(crudboard::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(crudboard::validation))]
    Validation { field: String, reason: String },

    #[error("Record failed validation")]
    #[diagnostic(
        code(crudboard::rejected),
        help("{details}\nFix the listed fields and try again.")
    )]
    Rejected { details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(crudboard::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: crudboard config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(crudboard::config_invalid),
        help("Inspect it with: crudboard config show")
    )]
    ConfigInvalid { message: String },

    #[error(transparent)]
    #[diagnostic(code(crudboard::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(
        code(crudboard::prompt),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    Prompt(String),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(crudboard::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(crudboard::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::Rejected { .. }
            | Self::ProfileNotFound { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_)
            | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { resource, reason } => CliError::ConnectionFailed {
                resource: resource.to_string(),
                reason,
            },

            CoreError::Timeout { resource } => CliError::Timeout {
                resource: resource.to_string(),
            },

            CoreError::NotFound { resource, id } => CliError::NotFound {
                resource_type: resource.singular().into(),
                identifier: id.to_string(),
                list_command: format!("{resource} list"),
            },

            CoreError::HttpStatus {
                resource,
                status: 404,
            } => CliError::NotFound {
                resource_type: resource.singular().into(),
                identifier: "(remote)".into(),
                list_command: format!("{resource} list"),
            },

            CoreError::HttpStatus { resource, status } => CliError::ApiError {
                code: status.to_string(),
                message: format!("{resource} request was rejected"),
            },

            CoreError::Decode { resource, message } => CliError::ApiError {
                code: "decode".into(),
                message: format!("unexpected {resource} response: {message}"),
            },

            CoreError::Validation(errors) => CliError::Rejected {
                details: errors.to_string(),
            },

            CoreError::InvalidField(err) => CliError::Validation {
                field: "--set".into(),
                reason: err.to_string(),
            },

            CoreError::Config { message } => CliError::ConfigInvalid { message },

            err @ (CoreError::NotEditing
            | CoreError::NothingLoaded
            | CoreError::Cancelled
            | CoreError::Internal(_)) => CliError::Internal(err.to_string()),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Io(err) => CliError::Io(err),
            ConfigError::Serialization(err) => CliError::ConfigInvalid {
                message: err.to_string(),
            },
        }
    }
}
