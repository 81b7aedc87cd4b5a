//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use munin_config::ConfigError;
use munin_core::{CoreError, Family};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the console backend at {url}")]
    #[diagnostic(
        code(munin::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Retry with --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(munin::auth_failed),
        help(
            "Verify the user and token of the active profile.\n\
             Run: munin config set-token"
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(munin::not_found),
        help("Run: munin {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("The backend rejected the request: {message}")]
    #[diagnostic(code(munin::rejected))]
    Rejected { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(munin::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(munin::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(munin::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: munin config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No console configured")]
    #[diagnostic(
        code(munin::no_config),
        help(
            "Create a profile with: munin config init\n\
             Or pass --server. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(munin::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(munin::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(munin::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    #[error("Internal error: {message}")]
    #[diagnostic(code(munin::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(munin::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML payload: {0}")]
    #[diagnostic(code(munin::yaml), help("Check the YAML file contents and try again."))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Convert a core error raised while working on `family`, naming the
    /// family's list command in not-found help.
    pub fn in_family(err: CoreError, family: Family) -> Self {
        match err {
            CoreError::NotFound { identifier, .. } => Self::NotFound {
                resource_type: family.label().into(),
                identifier,
                list_command: format!("{} list", family.plural()),
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: "<connections|metrics|projects|rules> list".into(),
                resource_type: entity_type,
                identifier,
            },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::Api { message, status } => Self::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },
            CoreError::Config { message } => Self::Config { message },
            err @ (CoreError::DuplicateSlice { .. }
            | CoreError::UnknownAction { .. }
            | CoreError::MalformedAction { .. }
            | CoreError::Internal(_)) => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(unknown)".into(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
