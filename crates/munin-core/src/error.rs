// ── Core error types ──
//
// User-facing errors from munin-core. Panels and the CLI never see raw
// HTTP statuses or JSON parse failures; `From<munin_api::Error>` folds
// transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("A store is already mounted under slice \"{name}\"")]
    DuplicateSlice { name: String },

    #[error("Unknown action type: {kind}")]
    UnknownAction { kind: String },

    #[error("Malformed {kind} action: {reason}")]
    MalformedAction { kind: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the backend refused the request for credential reasons.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Whether the failure came from input the backend or local checks rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Rejected { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<munin_api::Error> for CoreError {
    fn from(err: munin_api::Error) -> Self {
        match err {
            munin_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            munin_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            munin_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            munin_api::Error::Tls(message) => CoreError::ConnectionFailed {
                url: "<tls>".into(),
                reason: message,
            },
            munin_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            munin_api::Error::Api {
                status: 400 | 409 | 422,
                message,
                ..
            } => CoreError::Rejected { message },
            munin_api::Error::Api {
                status, message, ..
            } => CoreError::Api {
                message,
                status: Some(status),
            },
            munin_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("malformed backend response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_validation_statuses_become_rejections() {
        for status in [400, 409, 422] {
            let err = CoreError::from(munin_api::Error::Api {
                status,
                message: "name must be unique".into(),
                body: String::new(),
            });
            assert!(err.is_validation(), "status {status} gave {err:?}");
        }
    }

    #[test]
    fn server_errors_keep_their_status() {
        let err = CoreError::from(munin_api::Error::Api {
            status: 503,
            message: "maintenance".into(),
            body: String::new(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
    }

    #[test]
    fn missing_resources_carry_the_path() {
        let err = CoreError::from(munin_api::Error::NotFound {
            path: "/munin/v1/metric/9".into(),
        });
        assert_eq!(
            err.to_string(),
            "Entity not found: resource with id /munin/v1/metric/9"
        );
    }

    #[test]
    fn unauthorized_is_an_auth_error() {
        let err = CoreError::from(munin_api::Error::Authentication {
            message: "token rejected or missing".into(),
        });
        assert!(err.is_auth());
    }
}
