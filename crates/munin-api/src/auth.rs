use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Path the console backend is mounted under when no explicit API URL is set.
pub const DEFAULT_MOUNT: &str = "/munin";

/// A user/token pair sent as HTTP Basic credentials.
#[derive(Debug, Clone)]
pub struct Token {
    pub user: String,
    pub token: SecretString,
}

impl Token {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: SecretString::from(token.into()),
        }
    }

    /// Both halves must be non-empty for the header to be sent.
    pub fn is_usable(&self) -> bool {
        !self.user.is_empty() && !self.token.expose_secret().is_empty()
    }
}

/// Persisted session material: where the console lives and who we are.
///
/// Read-only from the client's point of view; produced by a credential
/// store (see `munin-config`).
#[derive(Debug, Clone)]
pub struct Session {
    /// Console host the user signed in to (e.g. `https://console.example.net`).
    pub server: Url,
    /// Explicit backend URL. When absent the backend is assumed to be mounted
    /// under [`DEFAULT_MOUNT`] on the console host.
    pub api_url: Option<Url>,
    pub token: Option<Token>,
}

impl Session {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            api_url: None,
            token: None,
        }
    }

    /// Build a session from a browser-style location: an optional protocol
    /// (`"http:"`, `"https:"`) and a `host[:port]`. Protocol defaults to https.
    pub fn from_location(protocol: Option<&str>, host: &str) -> Result<Self, Error> {
        let scheme = protocol
            .map(|p| p.trim_end_matches(':'))
            .filter(|p| !p.is_empty())
            .unwrap_or("https");
        let server = Url::parse(&format!("{scheme}://{host}"))?;
        Ok(Self::new(server))
    }

    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = Some(api_url);
        self
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Base URL every request path is appended to.
    pub fn api_base(&self) -> Url {
        if let Some(ref url) = self.api_url {
            return url.clone();
        }
        let mut base = self.server.clone();
        base.set_path(DEFAULT_MOUNT);
        base.set_query(None);
        base.set_fragment(None);
        base
    }
}
