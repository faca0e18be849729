//! `factory-agent run`: the heartbeat loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::time::MissedTickBehavior;

use crate::app::AppContext;
use crate::application::services::heartbeat::{AgentRuntime, CycleReport};
use crate::infra::settings::load_registered;
use crate::output::json;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Run a single heartbeat cycle and exit
    #[arg(long)]
    pub once: bool,
}

/// Entry point for `factory-agent run`.
///
/// # Errors
///
/// Returns an error if the agent is not registered, or if `--once` was given
/// and the cycle failed.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<()> {
    let settings = load_registered(&app.settings_store)?;
    let runtime = Arc::new(app.build_runtime(&settings));
    tracing::info!(
        pc_id = settings.pc_id,
        server = %settings.server_url,
        interval_secs = app.runtime.heartbeat_interval_secs,
        "agent starting"
    );

    if args.once {
        let report = cycle(&runtime).await?;
        if app.json {
            json::print(&serde_json::json!({
                "applicationRunning": report.application_running,
                "commandsReceived": report.commands_received,
                "completed": report.completed,
                "failed": report.failed,
            }))?;
        } else {
            app.output.success(&format!(
                "cycle finished: {} command(s), {} completed, {} failed",
                report.commands_received, report.completed, report.failed
            ));
        }
        return Ok(());
    }

    app.output.info(&format!(
        "agent running as PC {} (Ctrl-C to stop)",
        settings.pc_id
    ));
    let runtime = &runtime;
    let cycles = heartbeat_loop(
        app.runtime.heartbeat_interval(),
        tokio::signal::ctrl_c(),
        move || async move {
            match cycle(runtime).await {
                Ok(report) if report.commands_received > 0 => tracing::info!(
                    completed = report.completed,
                    failed = report.failed,
                    "cycle finished"
                ),
                Ok(_) => tracing::debug!("cycle finished"),
                Err(e) => tracing::warn!(error = %format!("{e:#}"), "cycle failed"),
            }
        },
    )
    .await;
    tracing::info!(cycles, "shutting down");
    app.output.success("agent stopped");
    Ok(())
}

/// Run `tick` every `interval` until `shutdown` completes; returns the number
/// of cycles run. `shutdown` is polled across the whole loop, so a signal
/// that arrives mid-cycle stops the loop once that cycle finishes.
async fn heartbeat_loop<S, F, Fut>(interval: Duration, shutdown: S, mut tick: F) -> usize
where
    S: Future,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                tick().await;
                cycles += 1;
            }
        }
    }
    cycles
}

/// Run one cycle on a blocking thread; cycles never overlap.
async fn cycle(runtime: &Arc<AgentRuntime>) -> Result<CycleReport> {
    let rt = Arc::clone(runtime);
    tokio::task::spawn_blocking(move || rt.run_cycle())
        .await
        .context("heartbeat cycle panicked")?
}
