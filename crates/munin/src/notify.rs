//! Terminal notifier: panel notifications printed to stderr.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use munin_core::{CoreError, Notifier};

use crate::cli::GlobalOpts;
use crate::output;

/// Prints success lines (unless quiet) and error lines with their cause.
#[derive(Debug, Clone, Copy)]
pub struct CliNotifier {
    quiet: bool,
    color: bool,
}

impl CliNotifier {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            quiet: global.quiet,
            color: output::should_color(global.color),
        }
    }
}

fn line(text: &str) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{text}");
}

impl Notifier for CliNotifier {
    fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            line(&format!("{} {message}", "✓".green().bold()));
        } else {
            line(&format!("✓ {message}"));
        }
    }

    fn error(&self, message: &str, err: &CoreError) {
        tracing::debug!(error = ?err, "{message}");
        if self.color {
            line(&format!("{} {}", "✗".red().bold(), message.red()));
        } else {
            line(&format!("✗ {message}"));
        }
    }
}
