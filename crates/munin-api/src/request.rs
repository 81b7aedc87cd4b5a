// Request descriptions handed to `ApiClient::request`.
//
// Mirrors the `{ method, path, query }` options object the console panels
// build for every call; the client turns it into a URL and a reqwest call.

use std::fmt;

use url::Url;

use crate::error::Error;

/// API version segment prefixed to every path unless overridden.
pub const DEFAULT_VERSION: &str = "v1";

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A query parameter value. Lists are serialised comma-joined (`a,b,c`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            Self::One(v) => v.clone(),
            Self::Many(vs) => vs.join(","),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        Self::One(v.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        Self::One(v)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(vs: Vec<String>) -> Self {
        Self::Many(vs)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(vs: &[&str]) -> Self {
        Self::Many(vs.iter().map(|v| (*v).to_owned()).collect())
    }
}

/// One request against the console backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    /// Resource path, starting with `/` (e.g. `/metric/12`).
    pub path: String,
    pub query: Vec<(String, QueryValue)>,
    /// Version segment; `None` addresses the unversioned root.
    pub version: Option<String>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            version: Some(DEFAULT_VERSION.to_owned()),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    /// Resolve against the backend base: `{base}/{version}{path}?{query}`.
    pub fn url(&self, base: &Url) -> Result<Url, Error> {
        let root = base.as_str().trim_end_matches('/');
        let version = self
            .version
            .as_deref()
            .map(|v| v.trim_matches('/'))
            .filter(|v| !v.is_empty())
            .map(|v| format!("/{v}"))
            .unwrap_or_default();
        let path = if self.path.starts_with('/') || self.path.is_empty() {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        let mut url = Url::parse(&format!("{root}{version}{path}"))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, &value.render());
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://console.local/munin").unwrap()
    }

    #[test]
    fn prefixes_default_version() {
        let url = RequestSpec::get("/connection").url(&base()).unwrap();
        assert_eq!(url.as_str(), "https://console.local/munin/v1/connection");
    }

    #[test]
    fn version_slashes_are_trimmed() {
        let url = RequestSpec::get("/metric/3")
            .with_version("/v2/")
            .url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "https://console.local/munin/v2/metric/3");
    }

    #[test]
    fn unversioned_requests_hit_the_root() {
        let url = RequestSpec::get("driver")
            .without_version()
            .url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "https://console.local/munin/driver");
    }

    #[test]
    fn list_query_values_are_comma_joined() {
        let url = RequestSpec::get("/metric")
            .with_query("projection", "recursive")
            .with_query("include", &["project", "connection"][..])
            .url(&base())
            .unwrap();
        assert_eq!(
            url.query(),
            Some("projection=recursive&include=project%2Cconnection")
        );
    }

    #[test]
    fn inline_query_in_path_is_kept() {
        let url = RequestSpec::get("/metric/view?page=2")
            .with_query("size", "50")
            .url(&base())
            .unwrap();
        assert_eq!(url.query(), Some("page=2&size=50"));
    }
}
