//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

const MASK: &str = "****";

/// The config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    cfg
}

/// TOML-like rendering of an (already redacted) config.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "link_base = \"{}\"", cfg.defaults.link_base);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if let Some(ref user) = p.user {
            let _ = writeln!(out, "user = \"{user}\"");
        }
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<String, CliError> {
    Password::new()
        .with_prompt("Token (empty for none)")
        .allow_empty_password(true)
        .interact()
        .map_err(prompt_err)
}

/// Set one profile key from its string form.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => profile.server = value,
        "api_url" | "api-url" => profile.api_url = Some(value),
        "user" => profile.user = Some(value),
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: server, api_url, user, \
                     token, token_env, ca_cert, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ProfileEntry<'a> {
    name: &'a str,
    server: &'a str,
    user: Option<&'a str>,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Default")]
    default: String,
}

impl From<&ProfileEntry<'_>> for ProfileRow {
    fn from(p: &ProfileEntry<'_>) -> Self {
        Self {
            name: p.name.into(),
            server: p.server.into(),
            user: p.user.unwrap_or("-").into(),
            default: if p.default { "*".into() } else { String::new() },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out =
                output::render_single(global.output, &cfg, format_config, |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: munin config init");
                return Ok(());
            }
            let default = cfg.profile_name(None);
            let entries: Vec<ProfileEntry<'_>> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileEntry {
                    name,
                    server: &p.server,
                    user: p.user.as_deref(),
                    default: name == default,
                })
                .collect();
            let out = output::render_list(
                global.output,
                &entries,
                |p| ProfileRow::from(p),
                |p| p.name.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let token = prompt_token()?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            munin_config::store_token(&profile_name, &token)?;
            eprintln!("✓ Token for profile '{profile_name}' stored in system keyring");
            Ok(())
        }
    }
}

/// Interactive wizard: one profile, made the default.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("munin -- configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Console URL or host")
        .default("https://localhost".into())
        .interact_text()
        .map_err(prompt_err)?;

    let user: String = Input::new()
        .with_prompt("User (empty for anonymous)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let mut token = None;
    if !user.is_empty() {
        let secret = prompt_token()?;
        if !secret.is_empty() {
            let choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let selection = Select::new()
                .with_prompt("Where to store the token?")
                .items(choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            if selection == 0 {
                munin_config::store_token(&profile_name, &secret)?;
                eprintln!("   ✓ Token stored in system keyring");
            } else {
                token = Some(secret);
            }
        }
    }

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            server,
            user: (!user.is_empty()).then_some(user),
            token,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());

    let written = config::save_config(&cfg)?;
    eprintln!("\n✓ Configuration written to {}", written.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: munin projects list");
    Ok(())
}
