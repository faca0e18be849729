//! Heartbeat cycle: liveness report, command execution, change sync.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use factory_agent::application::services::dispatcher::CommandDispatcher;
use factory_agent::application::services::heartbeat::AgentRuntime;
use factory_agent::application::services::sync::{ConfigService, InventorySync};
use factory_common::agent;
use serde_json::json;

use crate::mocks::{
    FixedProbe, MemoryConfigFile, MemoryLogFs, MemoryModels, RecordingTransport, StaticHandler,
    uniform_handlers,
};

fn runtime(transport: &Arc<RecordingTransport>, running: bool, handler: &StaticHandler) -> AgentRuntime {
    let config_file = Arc::new(MemoryConfigFile::with("[current_model]\nmodel = A\n"));
    let models = Arc::new(MemoryModels::with(&["A"], Some("A")));
    AgentRuntime {
        pc_id: 4,
        exe_name: "Inspect.exe".to_string(),
        transport: transport.clone(),
        probe: Arc::new(FixedProbe(running)),
        dispatcher: CommandDispatcher::new(uniform_handlers(handler), transport.clone()),
        config: Arc::new(ConfigService::new(4, config_file, transport.clone())),
        inventory: InventorySync::new(
            4,
            r"C:\Logs".to_string(),
            Arc::new(
                MemoryLogFs::default()
                    .dir(r"C:\Logs", &[("a.log", false)])
                    .file(r"C:\Logs\a.log", "line\n"),
            ),
            models,
            transport.clone(),
        ),
    }
}

#[test]
fn heartbeat_reports_liveness_and_runs_commands() {
    let transport = Arc::new(RecordingTransport::default());
    transport.reply(
        agent::HEARTBEAT,
        json!({
            "success": true,
            "hasPendingCommands": true,
            "commands": [
                {"commandId": 1, "commandType": "AnalyzeLog", "commandData": "{}"},
                {"commandId": 2, "commandType": "Reboot"},
            ],
        }),
    );
    let handler = StaticHandler::new("{}");
    let rt = runtime(&transport, true, &handler);

    let report = rt.run_cycle().unwrap();

    assert!(report.application_running);
    assert_eq!(report.commands_received, 2);
    assert_eq!(report.completed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        transport.posts_to(agent::HEARTBEAT)[0],
        json!({"pcId": 4, "isApplicationRunning": true})
    );
    assert_eq!(transport.posts_to(agent::COMMAND_RESULT).len(), 2);
}

#[test]
fn failed_heartbeat_runs_nothing() {
    let transport = Arc::new(RecordingTransport::default());
    transport.fail(agent::HEARTBEAT);
    let handler = StaticHandler::new("{}");
    let rt = runtime(&transport, false, &handler);

    assert!(rt.run_cycle().is_err());
    assert_eq!(handler.calls(), 0);
    assert!(transport.posts_to(agent::UPDATE_CONFIG).is_empty());
}

#[test]
fn rejected_heartbeat_is_an_error() {
    let transport = Arc::new(RecordingTransport::default());
    transport.reply(agent::HEARTBEAT, json!({"success": false}));
    let handler = StaticHandler::new("{}");
    let rt = runtime(&transport, false, &handler);

    let err = rt.run_cycle().unwrap_err();
    assert!(err.to_string().contains("rejected"));
}

#[test]
fn cycle_syncs_only_on_change() {
    let transport = Arc::new(RecordingTransport::default());
    transport.reply(agent::HEARTBEAT, json!({"success": true}));
    let handler = StaticHandler::new("{}");
    let rt = runtime(&transport, false, &handler);

    rt.run_cycle().unwrap();
    rt.run_cycle().unwrap();

    assert_eq!(transport.posts_to(agent::UPDATE_CONFIG).len(), 1);
    assert_eq!(transport.posts_to(agent::SYNC_LOG_STRUCTURE).len(), 1);
    assert_eq!(transport.posts_to(agent::UPDATE_LOG).len(), 1);
    let models = transport.posts_to(agent::SYNC_MODELS);
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["models"][0]["isCurrent"], true);
}

#[test]
fn sync_failure_does_not_fail_cycle() {
    let transport = Arc::new(RecordingTransport::default());
    transport.reply(agent::HEARTBEAT, json!({"success": true}));
    transport.fail(agent::SYNC_MODELS);
    let handler = StaticHandler::new("{}");
    let rt = runtime(&transport, false, &handler);

    assert!(rt.run_cycle().is_ok());
    assert_eq!(transport.posts_to(agent::UPDATE_CONFIG).len(), 1);
}
