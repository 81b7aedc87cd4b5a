mod cli;
mod commands;
mod config;
mod error;
mod notify;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use munin_core::{Console, Family, HistoryRouter};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::notify::CliNotifier;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let (family, args) = match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => return commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "munin", &mut std::io::stdout());
            return Ok(());
        }

        Command::Connections(args) => (Family::Connection, args),
        Command::Metrics(args) => (Family::Metric, args),
        Command::Projects(args) => (Family::Project, args),
        Command::Rules(args) => (Family::Rule, args),
    };

    let console_config = config::resolve_console_config(&cli.global)?;
    let router = Arc::new(HistoryRouter::new());
    let console = Console::new(
        console_config,
        Arc::new(CliNotifier::new(&cli.global)),
        Arc::clone(&router) as Arc<dyn munin_core::Router>,
    )?;

    tracing::debug!(%family, command = ?args.command, "dispatching command");
    commands::entity::handle(&console, family, args, &cli.global).await?;

    if let Some(pathname) = router.current() {
        tracing::debug!(%pathname, "panel location");
    }
    Ok(())
}
