//! Config and inventory sync deduplication.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use factory_agent::application::ports::ConfigApplier;
use factory_agent::application::services::sync::{ConfigService, InventorySync};
use factory_common::agent;

use crate::mocks::{MemoryConfigFile, MemoryLogFs, MemoryModels, RecordingTransport};

fn config_service(content: &str) -> (ConfigService, Arc<MemoryConfigFile>, Arc<RecordingTransport>) {
    let file = Arc::new(MemoryConfigFile::with(content));
    let transport = Arc::new(RecordingTransport::default());
    (
        ConfigService::new(9, file.clone(), transport.clone()),
        file,
        transport,
    )
}

#[test]
fn config_sync_posts_content_once() {
    let (service, _, transport) = config_service("speed = 1\n");

    assert!(service.sync_to_server().unwrap());
    assert!(!service.sync_to_server().unwrap());

    let posts = transport.posts_to(agent::UPDATE_CONFIG);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["pcId"], 9);
    assert_eq!(posts[0]["configContent"], "speed = 1\n");
}

#[test]
fn local_edit_is_synced_again() {
    let (service, file, transport) = config_service("speed = 1\n");
    service.sync_to_server().unwrap();
    file.set("speed = 2\n");
    assert!(service.sync_to_server().unwrap());
    assert_eq!(transport.posts_to(agent::UPDATE_CONFIG).len(), 2);
}

#[test]
fn applied_config_is_not_echoed_back() {
    let (service, file, transport) = config_service("speed = 1\n");
    service.apply("speed = 5\n").unwrap();

    assert_eq!(*file.content.lock().unwrap(), "speed = 5\n");
    assert!(!service.sync_to_server().unwrap());
    assert!(transport.posts_to(agent::UPDATE_CONFIG).is_empty());
}

#[test]
fn empty_config_is_refused() {
    let (service, file, _) = config_service("speed = 1\n");
    assert!(service.apply("").is_err());
    assert_eq!(*file.content.lock().unwrap(), "speed = 1\n");
}

#[test]
fn failed_post_is_retried_next_time() {
    let (service, _, transport) = config_service("speed = 1\n");
    transport.fail(agent::UPDATE_CONFIG);
    assert!(service.sync_to_server().is_err());
    transport.failing.lock().unwrap().clear();
    assert!(service.sync_to_server().unwrap());
}

#[test]
fn model_sync_follows_model_changes() {
    let models = Arc::new(MemoryModels::with(&["A", "B"], Some("A")));
    let transport = Arc::new(RecordingTransport::default());
    let sync = InventorySync::new(
        9,
        "/logs".to_string(),
        Arc::new(MemoryLogFs::default()),
        models.clone(),
        transport.clone(),
    );

    assert!(sync.sync_models().unwrap());
    assert!(!sync.sync_models().unwrap());
    *models.current.lock().unwrap() = Some("B".to_string());
    assert!(sync.sync_models().unwrap());

    let posts = transport.posts_to(agent::SYNC_MODELS);
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1]["models"][1]["modelName"], "B");
    assert_eq!(posts[1]["models"][1]["isCurrent"], true);
}

#[test]
fn log_structure_is_posted_as_json_string() {
    let transport = Arc::new(RecordingTransport::default());
    let sync = InventorySync::new(
        9,
        "/logs".to_string(),
        Arc::new(MemoryLogFs::default().dir("/logs", &[("a.log", false)])),
        Arc::new(MemoryModels::default()),
        transport.clone(),
    );

    assert!(sync.sync_log_structure().unwrap());
    assert!(!sync.sync_log_structure().unwrap());

    let posts = transport.posts_to(agent::SYNC_LOG_STRUCTURE);
    let tree: serde_json::Value =
        serde_json::from_str(posts[0]["logStructureJson"].as_str().unwrap()).unwrap();
    assert_eq!(tree[0]["name"], "a.log");
    assert_eq!(tree[0]["size"], 1);
}

fn log_sync(fs: MemoryLogFs) -> (InventorySync, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let sync = InventorySync::new(
        9,
        r"C:\Logs".to_string(),
        Arc::new(fs),
        Arc::new(MemoryModels::default()),
        transport.clone(),
    );
    (sync, transport)
}

#[test]
fn log_content_posts_first_non_empty_file() {
    let fs = MemoryLogFs::default()
        .dir(
            r"C:\Logs",
            &[("c.log", false), ("2024", true), ("a.log", false), ("b.log", false)],
        )
        .file(r"C:\Logs\a.log", "")
        .file(r"C:\Logs\b.log", "barrel B1\n")
        .file(r"C:\Logs\c.log", "later\n");
    let (sync, transport) = log_sync(fs);

    assert!(sync.sync_log_content().unwrap());
    assert!(!sync.sync_log_content().unwrap());

    let posts = transport.posts_to(agent::UPDATE_LOG);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["pcId"], 9);
    assert_eq!(posts[0]["logFileName"], "b.log");
    assert_eq!(posts[0]["logContent"], "barrel B1\n");
}

#[test]
fn log_content_without_folder_sends_nothing() {
    let (sync, transport) = log_sync(MemoryLogFs::default());
    assert!(!sync.sync_log_content().unwrap());
    assert!(transport.posts_to(agent::UPDATE_LOG).is_empty());
}

#[test]
fn failed_log_content_post_is_retried() {
    let fs = MemoryLogFs::default()
        .dir(r"C:\Logs", &[("a.log", false)])
        .file(r"C:\Logs\a.log", "x");
    let (sync, transport) = log_sync(fs);
    transport.fail(agent::UPDATE_LOG);
    assert!(sync.sync_log_content().is_err());
    transport.failing.lock().unwrap().clear();
    assert!(sync.sync_log_content().unwrap());
}
