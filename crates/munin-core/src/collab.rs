// ── Collaborators ──
//
// Interfaces the console drives but does not implement: user-visible
// notifications, navigation, and the persisted credential store.

use std::sync::{Mutex, PoisonError};

use munin_api::Session;
use tracing::{info, warn};

use crate::error::CoreError;

/// Shows success and error notifications to the user.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str, err: &CoreError);
}

/// Pushes a new location onto the navigation history.
pub trait Router: Send + Sync {
    fn push(&self, pathname: &str);
}

/// Read-only source of the persisted session.
pub trait CredentialStore: Send + Sync {
    fn read(&self) -> Result<Session, CoreError>;
}

// ── Defaults ─────────────────────────────────────────────────────────

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str, err: &CoreError) {
        warn!(error = %err, "{message}");
    }
}

/// Router that records every pushed pathname.
#[derive(Debug, Default)]
pub struct HistoryRouter {
    history: Mutex<Vec<String>>,
}

impl HistoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently pushed pathname.
    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Every pushed pathname, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Router for HistoryRouter {
    fn push(&self, pathname: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pathname.to_owned());
    }
}

/// A credential store holding one fixed session.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Session);

impl CredentialStore for StaticCredentials {
    fn read(&self) -> Result<Session, CoreError> {
        Ok(self.0.clone())
    }
}
