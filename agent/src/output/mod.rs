//! Human-readable output of the agent's commands: barrel timelines and
//! summaries from `analyze`, settings from `config show`, and cycle status
//! from `run`. JSON output lives in [`json`].

pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Where and how human output is printed for one invocation.
pub struct OutputContext {
    /// Colors, plain when stdout is not a terminal or `NO_COLOR` is set.
    pub styles: Styles,
    /// Stdout is a terminal.
    pub is_tty: bool,
    /// `--quiet` or `--json`: only errors are printed.
    pub quiet: bool,
}

impl OutputContext {
    /// Output settings from `--no-color`, `--quiet`/`--json`, and the terminal.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// `✓ msg`, e.g. a finished cycle or registration.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// `⚠ msg`, e.g. no barrels found or an operation that never ended.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// `✗ msg` on stderr, printed even when quiet.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// `ℹ msg`, e.g. the agent's PC number at startup.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Heading for a barrel or the summary block.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// One `key  value` row of a settings or summary block.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}
