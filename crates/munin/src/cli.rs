//! Clap derive structures for the `munin` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// munin -- administer a munin monitoring console
#[derive(Debug, Parser)]
#[command(
    name = "munin",
    version,
    about = "Manage munin connections, metrics, projects and rules",
    long_about = "Command-line console for the munin monitoring backend.\n\n\
        Every record family is a panel: lists are grouped and filterable,\n\
        drafts are edited field by field with --set path=value.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Console profile to use
    #[arg(long, short = 'p', env = "MUNIN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Console URL or bare host (overrides profile)
    #[arg(long, short = 's', env = "MUNIN_SERVER", global = true)]
    pub server: Option<String>,

    /// Explicit backend URL (defaults to {server}/munin)
    #[arg(long, env = "MUNIN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// User half of the Basic credentials
    #[arg(long, short = 'u', env = "MUNIN_USER", global = true)]
    pub user: Option<String>,

    /// Access token
    #[arg(long, env = "MUNIN_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MUNIN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MUNIN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MUNIN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Origin of the links used as selection values
    #[arg(long, env = "MUNIN_LINK_BASE", global = true)]
    pub link_base: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if stderr is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage backend connections
    #[command(alias = "conn")]
    Connections(EntityArgs),

    /// Manage metrics
    #[command(alias = "m")]
    Metrics(EntityArgs),

    /// Manage projects
    #[command(alias = "proj")]
    Projects(EntityArgs),

    /// Manage munin rules
    Rules(EntityArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PANELS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub command: EntityCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// List records, grouped
    #[command(alias = "ls")]
    List {
        /// Keep records whose name contains TEXT (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Collapse every group to its header
        #[arg(long)]
        collapsed: bool,

        /// Flip the collapse state of one group (repeatable)
        #[arg(long, value_name = "GROUP")]
        toggle: Vec<String>,
    },

    /// Show one record
    Show {
        /// Record id (or ref, for rules)
        id: String,
    },

    /// Create a record from assignments and/or a file
    Create {
        /// Field assignment PATH=VALUE (repeatable; JSON values are parsed)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// JSON or YAML file merged into the draft before --set
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Edit a record
    Edit {
        /// Record id (or ref, for rules)
        id: String,

        /// Field assignment PATH=VALUE (repeatable; JSON values are parsed)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// JSON or YAML file merged into the draft before --set
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id (or ref, for rules)
        id: String,
    },

    /// Show the selection lists the family's forms pick from
    Lookups,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display the current configuration, secrets masked
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (server, api_url, user, token_env, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's token in the system keyring
    SetToken,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
