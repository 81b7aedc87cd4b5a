//! CLI configuration: thin layer over `munin_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--server,
//! --token, --insecure, ...) on top of the active profile.

use std::time::Duration;

use munin_api::Token;
use munin_config::{ProfileStore, profile_tls};
use munin_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use munin_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config
            .profiles
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Layer flag overrides onto a profile.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(ref api_url) = global.api_url {
        profile.api_url = Some(api_url.clone());
    }
    if let Some(ref user) = global.user {
        profile.user = Some(user.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Build a `ConsoleConfig` from the config file, the active profile and
/// flag overrides. Without a matching profile, `--server` alone suffices.
pub fn resolve_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let mut cfg = load_config_or_default();
    resolve_with(&mut cfg, global)
}

fn resolve_with(cfg: &mut Config, global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let name = active_profile_name(global, cfg);
    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.server.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };
    apply_overrides(&mut profile, global);

    let tls = profile_tls(&profile, &cfg.defaults);
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(cfg.defaults.timeout));
    let link_base = global
        .link_base
        .clone()
        .unwrap_or_else(|| cfg.defaults.link_base.clone());
    let user = profile.user.clone();
    cfg.profiles.insert(name.clone(), profile);

    let store = ProfileStore::new(cfg.clone(), Some(&name));
    let mut config = ConsoleConfig::from_credentials(&store)?
        .with_tls(tls)
        .with_timeout(timeout)
        .with_link_base(link_base);

    if let Some(ref token) = global.token {
        let user = user.ok_or_else(|| CliError::Validation {
            field: "user".into(),
            reason: "--token needs a user (--user or the profile's user)".into(),
        })?;
        config.session = config.session.with_token(Token::new(user, token.clone()));
    }
    tracing::debug!(
        profile = store.profile_name(),
        api = %config.session.api_base(),
        auth = %munin_config::describe_auth(&config.session),
        "resolved console config"
    );
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["munin"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["projects", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, server: &str) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            name.into(),
            Profile {
                server: server.into(),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn server_flag_overrides_profile() {
        let mut cfg = config_with("default", "https://old.example.net");
        let config = resolve_with(&mut cfg, &global(&["--server", "new.example.net"])).unwrap();
        assert_eq!(
            config.session.api_base().as_str(),
            "https://new.example.net/munin"
        );
    }

    #[test]
    fn server_flag_works_without_a_profile() {
        let mut cfg = Config::default();
        let config = resolve_with(
            &mut cfg,
            &global(&["--server", "http://localhost:8080", "--link-base", "http://ui"]),
        )
        .unwrap();
        assert_eq!(config.session.server.as_str(), "http://localhost:8080/");
        assert_eq!(config.link_base, "http://ui");
    }

    #[test]
    fn unknown_explicit_profile_is_reported() {
        let mut cfg = config_with("lab", "lab.example.net");
        let err = resolve_with(&mut cfg, &global(&["--profile", "prod"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_config_without_server_is_no_config() {
        let mut cfg = Config::default();
        let err = resolve_with(&mut cfg, &global(&[])).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn token_flag_requires_a_user() {
        let mut cfg = config_with("default", "console.example.net");
        let err = resolve_with(&mut cfg, &global(&["--token", "s3cret"])).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "user"));

        let config = resolve_with(&mut cfg, &global(&["--token", "s3cret", "--user", "ops"])).unwrap();
        assert_eq!(config.session.token.unwrap().user, "ops");
    }
}
