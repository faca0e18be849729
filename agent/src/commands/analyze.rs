//! `factory-agent analyze`: operation timeline of a local log file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::log_service;
use crate::domain::log_analysis::{AnalysisOptions, LogAnalysis, analyze_log};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Inspection log file
    pub file: PathBuf,
    /// List operations that started but never ended
    #[arg(long)]
    pub report_incomplete: bool,
}

/// Entry point for `factory-agent analyze`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn run(app: &AppContext, args: &AnalyzeArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to open file: {}", args.file.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let options = AnalysisOptions {
        report_incomplete: args.report_incomplete
            || app.runtime.analysis_options().report_incomplete,
    };
    let analysis = analyze_log(&content, options);

    if app.json {
        let doc: serde_json::Value =
            serde_json::from_str(&log_service::analysis_response(&analysis)?)?;
        crate::output::json::print(&doc)?;
    } else {
        render(app, &analysis);
    }
    Ok(())
}

fn render(app: &AppContext, analysis: &LogAnalysis) {
    let out = &app.output;
    if analysis.barrels.is_empty() {
        out.warn("no barrels found");
    }

    for barrel in &analysis.barrels {
        out.header(&format!(
            "Barrel {}: {} ms",
            barrel.barrel_id, barrel.total_execution_time
        ));
        if out.quiet {
            continue;
        }
        for op in &barrel.operations {
            let line = format!(
                "{:>3}. {:<32} {:>7} ms  (ideal {} ms)",
                op.sequence, op.operation_name, op.actual_duration, op.ideal_duration
            );
            if op.actual_duration > op.ideal_duration {
                println!("    {}", line.style(out.styles.slow));
            } else {
                println!("    {line}");
            }
        }
    }

    let s = &analysis.summary;
    out.header("Summary");
    out.kv("barrels", &s.total_barrels.to_string());
    out.kv("average", &format!("{:.1} ms", s.average_execution_time));
    out.kv("min", &format!("{} ms", s.min_execution_time));
    out.kv("max", &format!("{} ms", s.max_execution_time));

    if let Some(incomplete) = &analysis.incomplete_operations {
        for op in incomplete {
            out.warn(&format!(
                "{} / {} started at {} never ended",
                op.barrel_id, op.operation_name, op.start_time
            ));
        }
    }
}
