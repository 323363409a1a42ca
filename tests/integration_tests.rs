//! Integration tests against an in-memory connect cluster
//!
//! Exercises the map semantics of the connector collection end to end:
//! client → reqwest → wiremock → stateful fake cluster.

mod common;

use common::FakeCluster;
use futures::TryStreamExt;
use kafka_connect::{Connector, ConnectorConfig, ConnectorState, Error, TaskState};
use pretty_assertions::assert_eq;

fn config(pairs: &[(&str, &str)]) -> ConnectorConfig {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn file_source(topic: &str) -> ConnectorConfig {
    config(&[("connector.class", "FileStreamSource"), ("topic", topic)])
}

// ============================================================================
// Collection Semantics
// ============================================================================

#[tokio::test]
async fn test_create_then_get_round_trips_config() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    connectors
        .set("sample-connector", file_source("test"))
        .await
        .unwrap();

    let connector = connectors.get("sample-connector").await.unwrap();
    assert_eq!(connector.name(), "sample-connector");
    assert_eq!(connector.config()["topic"], "test");
    for (key, value) in file_source("test") {
        assert_eq!(connector.config()[&key], value);
    }
}

#[tokio::test]
async fn test_set_is_idempotent_and_replaces() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    let cfg = config(&[
        ("connector.class", "FileStreamSource"),
        ("topic", "a"),
        ("file", "/tmp/in"),
    ]);
    connectors.set("c", cfg.clone()).await.unwrap();
    connectors.set("c", cfg).await.unwrap();
    assert_eq!(connectors.len().await.unwrap(), 1);

    // Full replace: keys not in the new config are gone.
    connectors.set("c", file_source("b")).await.unwrap();
    let connector = connectors.get("c").await.unwrap();
    assert_eq!(connector.config()["topic"], "b");
    assert!(!connector.config().contains_key("file"));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_with_server_message() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);

    let err = kc
        .connectors()
        .set("broken", config(&[("topic", "x")]))
        .await
        .unwrap_err();

    match err {
        Error::InvalidRequest { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("no connector type"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!kc.connectors().contains("broken").await.unwrap());
}

#[tokio::test]
async fn test_delete_then_contains_is_false() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    connectors.set("existing", file_source("t")).await.unwrap();
    assert!(connectors.contains("existing").await.unwrap());

    for name in ["existing", "never-created"] {
        connectors.delete(name).await.unwrap();
        assert!(!connectors.contains(name).await.unwrap());
    }

    // Deleting twice is fine too.
    connectors.delete("existing").await.unwrap();
}

#[tokio::test]
async fn test_delete_nonexistent_succeeds() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);

    kc.connectors().delete("nonexistent").await.unwrap();
}

#[tokio::test]
async fn test_dot_and_empty_names_are_never_present() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();
    connectors.set("c", file_source("t")).await.unwrap();

    for name in ["", ".", ".."] {
        connectors.delete(name).await.unwrap();
        assert!(!connectors.contains(name).await.unwrap());
    }
    assert_eq!(connectors.names().await.unwrap(), vec!["c".to_string()]);
}

#[tokio::test]
async fn test_handle_drives_lifecycle_without_detail_fetch() {
    let (fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    kc.connectors().set("c", file_source("t")).await.unwrap();
    let before = server.received_requests().await.unwrap().len();

    let handle = kc.connectors().handle("c");
    handle.pause().await.unwrap();
    handle.restart_task(0).await.unwrap();
    assert_eq!(fake.connector_state("c"), Some("PAUSED"));
    assert_eq!(server.received_requests().await.unwrap().len(), before + 2);

    assert!(kc
        .connectors()
        .handle("ghost")
        .restart()
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_get_after_external_delete_is_not_found() {
    let (fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    connectors.set("c", file_source("t")).await.unwrap();
    let stale = connectors.get("c").await.unwrap();
    fake.external_delete("c");

    assert!(connectors.get("c").await.unwrap_err().is_not_found());
    assert!(stale.pause().await.unwrap_err().is_not_found());
    assert!(stale.status().await.unwrap_err().is_not_found());
}

// ============================================================================
// Iteration
// ============================================================================

#[tokio::test]
async fn test_iteration_visits_each_listed_name_once_in_order() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    for name in ["delta", "alpha", "charlie", "bravo"] {
        connectors.set(name, file_source(name)).await.unwrap();
    }

    let listed = connectors.names().await.unwrap();
    let visited: Vec<Connector> = connectors.iter().try_collect().await.unwrap();
    let visited: Vec<String> = visited.iter().map(|c| c.name().to_string()).collect();

    assert_eq!(visited, listed);
}

#[tokio::test]
async fn test_iteration_of_empty_cluster_issues_only_the_list_call() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);

    let all: Vec<Connector> = kc.connectors().iter().try_collect().await.unwrap();
    assert!(all.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/connectors");
}

#[tokio::test]
async fn test_iteration_aborts_on_connector_deleted_mid_way() {
    let (fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    for name in ["a", "b", "c"] {
        connectors.set(name, file_source(name)).await.unwrap();
    }

    let mut stream = connectors.iter();
    let first = stream.try_next().await.unwrap().unwrap();
    assert_eq!(first.name(), "a");

    fake.external_delete("b");
    assert!(stream.try_next().await.unwrap_err().is_not_found());
    assert!(stream.try_next().await.unwrap().is_none());
}

// ============================================================================
// Config Mutation
// ============================================================================

#[tokio::test]
async fn test_set_config_key_preserves_other_keys() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    let original = config(&[
        ("connector.class", "FileStreamSource"),
        ("topic", "orders"),
        ("file", "/var/log/orders"),
        ("batch.size", "100"),
    ]);
    connectors.set("c", original.clone()).await.unwrap();

    let mut connector = connectors.get("c").await.unwrap();
    connector.set_config_key("batch.size", "500").await.unwrap();

    let stored = connectors.get("c").await.unwrap();
    for (key, value) in &original {
        if key == "batch.size" {
            assert_eq!(stored.config()[key], "500");
        } else {
            assert_eq!(&stored.config()[key], value);
        }
    }
    assert_eq!(connector.config(), stored.config());
}

#[tokio::test]
async fn test_set_config_key_merges_with_fresh_config() {
    let (fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    connectors.set("c", file_source("t")).await.unwrap();
    let mut connector = connectors.get("c").await.unwrap();

    // Someone else adds a key after our snapshot was taken.
    fake.external_update("c", "file", "/tmp/external");
    connector.set_config_key("topic", "u").await.unwrap();

    let stored = connectors.get("c").await.unwrap();
    assert_eq!(stored.config()["file"], "/tmp/external");
    assert_eq!(stored.config()["topic"], "u");
}

#[tokio::test]
async fn test_remove_config_key() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connectors = kc.connectors();

    connectors
        .set(
            "c",
            config(&[("connector.class", "FileStreamSource"), ("file", "/tmp/x")]),
        )
        .await
        .unwrap();
    let mut connector = connectors.get("c").await.unwrap();

    assert_eq!(
        connector.remove_config_key("file").await.unwrap(),
        Some("/tmp/x".to_string())
    );
    assert!(!connectors
        .get("c")
        .await
        .unwrap()
        .config()
        .contains_key("file"));
}

// ============================================================================
// Lifecycle and Tasks
// ============================================================================

#[tokio::test]
async fn test_pause_and_resume() {
    let (fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connector = kc.connectors().set("c", file_source("t")).await.unwrap();

    connector.pause().await.unwrap();
    assert_eq!(fake.connector_state("c"), Some("PAUSED"));
    assert_eq!(connector.state().await.unwrap(), ConnectorState::Paused);

    connector.resume().await.unwrap();
    assert_eq!(connector.state().await.unwrap(), ConnectorState::Running);
}

#[tokio::test]
async fn test_tasks_follow_cluster_order() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);

    let mut cfg = file_source("t");
    cfg.insert("tasks.max".to_string(), "3".to_string());
    let connector = kc.connectors().set("c", cfg).await.unwrap();
    assert_eq!(connector.tasks_count(), 3);

    let tasks: Vec<_> = connector.tasks().try_collect().await.unwrap();
    let ids: Vec<u32> = tasks.iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(tasks.iter().all(|t| t.state() == TaskState::Running));
    assert!(tasks.iter().all(|t| t.connector() == "c"));
}

#[tokio::test]
async fn test_task_restart_during_rebalance_is_conflict_not_server_error() {
    let (fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connector = kc.connectors().set("c", file_source("t")).await.unwrap();
    let task = connector.task(0).await.unwrap();

    fake.set_rebalancing(true);
    let err = task.restart().await.unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_eq!(err.status(), Some(409));

    let err = connector.restart().await.unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));

    fake.set_rebalancing(false);
    task.restart().await.unwrap();
    connector.restart().await.unwrap();
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);
    let connector = kc.connectors().set("c", file_source("t")).await.unwrap();

    assert!(connector.task(7).await.unwrap_err().is_not_found());
}

// ============================================================================
// Cluster Facade
// ============================================================================

#[tokio::test]
async fn test_info_and_plugins() {
    let (_fake, server) = FakeCluster::start().await;
    let kc = FakeCluster::client(&server);

    let info = kc.info().await.unwrap();
    assert_eq!(info.cluster_id, "fake-cluster");

    let plugins = kc.plugins().await.unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].info().alias(), "FileStreamSourceConnector");
}

#[tokio::test]
async fn test_unreachable_cluster() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let kc = kafka_connect::KafkaConnect::new(
        &kafka_connect::ClusterConfig::builder()
            .host("127.0.0.1")
            .port(port)
            .build(),
    )
    .unwrap();

    let err = kc.connectors().names().await.unwrap_err();
    assert!(matches!(err, Error::Unreachable { .. }));
    assert!(err.is_retryable());
}
