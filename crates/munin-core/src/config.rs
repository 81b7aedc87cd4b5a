// ── Runtime console configuration ──
//
// Describes how the console reaches its backend. Carries the session and
// transport tuning but never touches disk; the application shell builds
// a `ConsoleConfig` (usually from a `CredentialStore`) and hands it in.

use std::time::Duration;

use munin_api::{Session, TlsMode, TransportConfig};

use crate::collab::CredentialStore;
use crate::error::CoreError;
use crate::model::DEFAULT_LINK_BASE;

/// Configuration for one console instance.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend location and credentials.
    pub session: Session,
    /// TLS and timeout settings for the HTTP client.
    pub transport: TransportConfig,
    /// Origin of the links used as selection values.
    pub link_base: String,
}

impl ConsoleConfig {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            transport: TransportConfig::default(),
            link_base: DEFAULT_LINK_BASE.to_owned(),
        }
    }

    /// Build from the persisted session.
    pub fn from_credentials(store: &dyn CredentialStore) -> Result<Self, CoreError> {
        store.read().map(Self::new)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.with_timeout(timeout);
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.transport = self.transport.with_tls(tls);
        self
    }

    #[must_use]
    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }
}
