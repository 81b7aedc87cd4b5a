// Console backend HTTP client
//
// Wraps `reqwest::Client` with versioned URL construction, Basic auth from
// the persisted session, and JSON response handling. Endpoint knowledge
// (which resource lives where) belongs to `munin-core`; this module only
// moves `RequestSpec`s over the wire.

use serde_json::Value;
use secrecy::ExposeSecret;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Session;
use crate::error::Error;
use crate::request::RequestSpec;
use crate::transport::TransportConfig;

const REQUEST_ID_HEADER: &str = "X-Request-ID";
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the console's REST backend.
///
/// Every call returns the decoded JSON body: a HAL collection document for
/// list endpoints, the resource object for singleton endpoints, and
/// `Value::Null` for empty responses (typically `DELETE`). Successful
/// bodies not labelled `application/json` come back as `Value::String`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a session and transport settings.
    pub fn new(session: Session, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, session))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, session: Session) -> Self {
        let base_url = session.api_base();
        Self {
            http,
            session,
            base_url,
        }
    }

    /// The backend base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resolve a request description to its full URL.
    pub fn route(&self, spec: &RequestSpec) -> Result<Url, Error> {
        spec.url(&self.base_url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request and decode the JSON response.
    pub async fn request(&self, spec: &RequestSpec, body: Option<&Value>) -> Result<Value, Error> {
        let url = self.route(spec)?;
        debug!(method = %spec.method, %url, "request");

        let mut builder = self.http.request(spec.method.as_reqwest(), url.clone());
        if let Some(token) = self.session.token.as_ref().filter(|t| t.is_usable()) {
            builder = builder.basic_auth(&token.user, Some(token.token.expose_secret()));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        } else {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        self.parse_response(url, resp).await
    }

    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.request(&RequestSpec::get(path), None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.request(&RequestSpec::post(path), Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.request(&RequestSpec::put(path), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        self.request(&RequestSpec::delete(path), None).await
    }

    /// Map the HTTP status, then decode the body (JSON only when labelled so).
    async fn parse_response(&self, url: Url, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if let Some(request_id) = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            trace!(%request_id, %status, "response");
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "token rejected or missing".into(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: url.path().to_owned(),
            });
        }

        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        if !is_json {
            return Ok(Value::String(body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// Pull a human readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    ["message", "faultstring", "error"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(Value::as_str))
        .map(String::from)
        .or_else(|| (!body.is_empty()).then(|| preview(body)))
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
