//! Process infrastructure: implements `ProcessProbe` with the platform's
//! process listing tool.

use crate::application::ports::{CommandRunner, ProcessProbe};

/// File name of an executable path, without directories.
#[must_use]
pub fn exe_file_name(exe: &str) -> &str {
    exe.rsplit(['\\', '/']).next().unwrap_or(exe)
}

/// Process name of one listing row: the first quoted CSV field of a
/// `tasklist` row, or the whole trimmed line of `ps` output.
fn row_process_name(line: &str) -> &str {
    let line = line.trim();
    match line.strip_prefix('"') {
        Some(rest) => rest.split('"').next().unwrap_or_default(),
        None => exe_file_name(line),
    }
}

/// Whether a process listing has a process named `exe_name`
/// (case-insensitive, whole name).
#[must_use]
pub fn listing_contains(listing: &str, exe_name: &str) -> bool {
    let wanted = exe_file_name(exe_name).to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    listing
        .lines()
        .map(row_process_name)
        .any(|name| name.to_lowercase() == wanted)
}

/// Production `ProcessProbe` that queries `tasklist` on Windows and `ps`
/// elsewhere.
pub struct SystemProcessProbe<R> {
    runner: R,
}

impl<R: CommandRunner> SystemProcessProbe<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ProcessProbe for SystemProcessProbe<R> {
    fn is_running(&self, exe_name: &str) -> bool {
        let result = if cfg!(windows) {
            self.runner.run("tasklist", &["/FO", "CSV", "/NH"])
        } else {
            self.runner.run("ps", &["-A", "-o", "comm="])
        };
        match result {
            Ok(output) => listing_contains(&String::from_utf8_lossy(&output.stdout), exe_name),
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "process listing failed");
                false
            }
        }
    }
}
