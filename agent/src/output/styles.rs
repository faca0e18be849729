//! Colors for the agent's terminal output: status lines, timeline headers,
//! and slow operations in `analyze`.

use owo_colors::Style;

/// Styles used by `OutputContext`. All plain until `colorize` is called.
#[derive(Default, Clone)]
pub struct Styles {
    /// Completed steps and cycles
    pub success: Style,
    /// Empty logs, unfinished operations, missing settings
    pub warning: Style,
    /// Fatal errors on stderr
    pub error: Style,
    /// Progress notes such as registration steps
    pub info: Style,
    /// Keys of settings and summary rows
    pub dim: Style,
    /// Barrel and summary headings
    pub header: Style,
    /// Operations slower than their ideal duration
    pub slow: Style,
}

impl Styles {
    /// Switch on colors for an attended terminal.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold().cyan();
        self.slow = Style::new().bold().red();
    }
}
