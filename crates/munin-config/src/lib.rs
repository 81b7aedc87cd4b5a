//! Shared configuration for the munin console tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation into `munin_core::ConsoleConfig`. [`ProfileStore`] is the
//! persisted credential store the console reads its session from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use munin_api::{Session, TlsMode, Token};
use munin_core::{ConsoleConfig, CoreError, CredentialStore};

/// Keyring service every stored token lives under.
pub const KEYRING_SERVICE: &str = "munin";

/// Environment prefix for config overrides and credential fallbacks.
pub const ENV_PREFIX: &str = "MUNIN_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named console profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the explicit one, else the default.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Origin of the links used as selection values.
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            link_base: default_link_base(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_link_base() -> String {
    munin_core::model::DEFAULT_LINK_BASE.into()
}

/// A named console profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Console URL (e.g. "https://console.example.net") or bare host.
    pub server: String,

    /// Explicit backend URL; defaults to `{server}/munin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// User half of the Basic credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "munin", "munin").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("munin");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config layered as defaults → `path` → `MUNIN_*` environment.
/// Nested keys use a double underscore (`MUNIN_DEFAULTS__OUTPUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Store a profile's token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

/// Where token resolution may look besides the profile itself.
pub struct TokenSources<'a> {
    /// Environment lookup.
    pub env: &'a (dyn Fn(&str) -> Option<String> + Sync),
    /// Whether to consult the system keyring.
    pub keyring: bool,
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl TokenSources<'static> {
    /// The process environment and the system keyring.
    pub fn system() -> Self {
        Self {
            env: &process_env,
            keyring: true,
        }
    }
}

/// Resolve a profile's Basic credentials from the process environment
/// and keyring. `None` means the backend is reached unauthenticated.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<Option<Token>, ConfigError> {
    resolve_token_with(profile, profile_name, &TokenSources::system())
}

/// Resolve a profile's token through the chain:
///
/// 1. the variable named by `token_env`,
/// 2. the keyring entry `munin/{profile}/token`,
/// 3. `MUNIN_TOKEN`,
/// 4. the plaintext `token`.
///
/// The user comes from the profile, else `MUNIN_USER`.
pub fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    sources: &TokenSources<'_>,
) -> Result<Option<Token>, ConfigError> {
    let env = sources.env;
    let secret = profile
        .token_env
        .as_deref()
        .and_then(env)
        .or_else(|| {
            sources
                .keyring
                .then(|| keyring_entry(profile_name).ok()?.get_password().ok())
                .flatten()
        })
        .or_else(|| env(&format!("{ENV_PREFIX}TOKEN")))
        .or_else(|| profile.token.clone());

    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let user = profile
        .user
        .clone()
        .or_else(|| env(&format!("{ENV_PREFIX}USER")))
        .ok_or_else(|| ConfigError::Validation {
            field: "user".into(),
            reason: format!("profile '{profile_name}' has a token but no user"),
        })?;
    Ok(Some(Token::new(user, secret)))
}

// ── Translation into runtime types ──────────────────────────────────

fn parse_server(server: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    };
    if server.contains("://") {
        return Url::parse(server).map_err(|_| invalid());
    }
    Session::from_location(None, server)
        .map(|session| session.server)
        .map_err(|_| invalid())
}

/// Build the backend session for a profile.
pub fn profile_to_session(
    profile: &Profile,
    profile_name: &str,
    sources: &TokenSources<'_>,
) -> Result<Session, ConfigError> {
    let mut session = Session::new(parse_server(&profile.server)?);
    if let Some(ref api_url) = profile.api_url {
        let url = Url::parse(api_url).map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {api_url}"),
        })?;
        session = session.with_api_url(url);
    }
    if let Some(token) = resolve_token_with(profile, profile_name, sources)? {
        session = session.with_token(token);
    }
    Ok(session)
}

/// TLS mode of a profile: insecure wins, then a custom CA, else the
/// system store.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsMode {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    }
}

/// Build a `ConsoleConfig` from a profile, with no CLI overrides.
pub fn profile_to_console_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let session = profile_to_session(profile, profile_name, &TokenSources::system())?;
    Ok(ConsoleConfig::new(session)
        .with_tls(profile_tls(profile, defaults))
        .with_timeout(Duration::from_secs(
            profile.timeout.unwrap_or(defaults.timeout),
        ))
        .with_link_base(defaults.link_base.clone()))
}

// ── Credential store ────────────────────────────────────────────────

/// The persisted session of one profile.
pub struct ProfileStore<'a> {
    config: Config,
    profile_name: String,
    sources: TokenSources<'a>,
}

impl ProfileStore<'static> {
    /// Read `profile_name` (or the default) from `config`.
    pub fn new(config: Config, profile_name: Option<&str>) -> Self {
        Self::with_sources(config, profile_name, TokenSources::system())
    }
}

impl<'a> ProfileStore<'a> {
    pub fn with_sources(config: Config, profile_name: Option<&str>, sources: TokenSources<'a>) -> Self {
        let profile_name = config.profile_name(profile_name).to_owned();
        Self {
            config,
            profile_name,
            sources,
        }
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl CredentialStore for ProfileStore<'_> {
    fn read(&self) -> Result<Session, CoreError> {
        let profile = self.config.profile(&self.profile_name)?;
        Ok(profile_to_session(profile, &self.profile_name, &self.sources)?)
    }
}

/// Whether a session carries a usable token, for display.
pub fn describe_auth(session: &Session) -> String {
    match session.token.as_ref().filter(|t| t.is_usable()) {
        Some(token) => format!(
            "{} (token: {} chars)",
            token.user,
            token.token.expose_secret().chars().count()
        ),
        None => "anonymous".into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn offline() -> TokenSources<'static> {
        TokenSources {
            env: &no_env,
            keyring: false,
        }
    }

    fn profile() -> Profile {
        Profile {
            server: "https://console.example.net".into(),
            user: Some("admin".into()),
            token: Some("plain".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn token_env_wins_over_plaintext() {
        let profile = Profile {
            token_env: Some("OPS_TOKEN".into()),
            ..profile()
        };
        let env = |name: &str| (name == "OPS_TOKEN").then(|| "from-env".to_owned());
        let sources = TokenSources {
            env: &env,
            keyring: false,
        };
        let token = resolve_token_with(&profile, "ops", &sources).unwrap().unwrap();
        assert_eq!(token.user, "admin");
        assert_eq!(token.token.expose_secret(), "from-env");
    }

    #[test]
    fn global_token_env_is_a_fallback() {
        let profile = Profile {
            token: None,
            ..profile()
        };
        let env = |name: &str| (name == "MUNIN_TOKEN").then(|| "global".to_owned());
        let sources = TokenSources {
            env: &env,
            keyring: false,
        };
        let token = resolve_token_with(&profile, "ops", &sources).unwrap().unwrap();
        assert_eq!(token.token.expose_secret(), "global");
    }

    #[test]
    fn missing_token_is_anonymous() {
        let profile = Profile {
            token: None,
            ..profile()
        };
        assert!(resolve_token_with(&profile, "ops", &offline()).unwrap().is_none());
    }

    #[test]
    fn token_without_user_is_rejected() {
        let profile = Profile {
            user: None,
            ..profile()
        };
        let err = resolve_token_with(&profile, "ops", &offline()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "user"));
    }

    #[test]
    fn bare_hosts_default_to_https() {
        let profile = Profile {
            server: "console.local:8443".into(),
            ..profile()
        };
        let session = profile_to_session(&profile, "ops", &offline()).unwrap();
        assert_eq!(session.api_base().as_str(), "https://console.local:8443/munin");
    }

    #[test]
    fn explicit_api_url_is_kept() {
        let profile = Profile {
            api_url: Some("http://10.0.0.5:9000/api".into()),
            ..profile()
        };
        let session = profile_to_session(&profile, "ops", &offline()).unwrap();
        assert_eq!(session.api_base().as_str(), "http://10.0.0.5:9000/api");
    }

    #[test]
    fn tls_mode_prefers_insecure() {
        let defaults = Defaults::default();
        let ca = Profile {
            ca_cert: Some("/etc/munin/ca.pem".into()),
            ..profile()
        };
        assert_eq!(profile_tls(&ca, &defaults), TlsMode::CustomCa("/etc/munin/ca.pem".into()));
        let insecure = Profile {
            insecure: Some(true),
            ..ca
        };
        assert_eq!(profile_tls(&insecure, &defaults), TlsMode::DangerAcceptInvalid);
        assert_eq!(profile_tls(&profile(), &defaults), TlsMode::System);
    }

    #[test]
    fn profile_store_reads_the_default_profile() {
        let mut config = Config::default();
        config.profiles.insert("default".into(), profile());
        let store = ProfileStore::with_sources(config, None, offline());
        let session = store.read().unwrap();
        assert_eq!(session.server.host_str(), Some("console.example.net"));
        assert_eq!(describe_auth(&session), "admin (token: 5 chars)");
    }

    #[test]
    fn unknown_profiles_are_config_errors() {
        let store = ProfileStore::with_sources(Config::default(), Some("nope"), offline());
        let err = store.read().unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error: profile 'nope' not found"
        );
    }

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.defaults.output = "json".into();
        config.profiles.insert("ops".into(), profile());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.output, "json");
        assert_eq!(loaded.profiles["ops"], profile());
        assert_eq!(loaded.profile_name(None), "default");
        assert_eq!(loaded.profile_name(Some("ops")), "ops");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.defaults.link_base, "http://localhost");
        assert!(loaded.profiles.is_empty());
    }
}
