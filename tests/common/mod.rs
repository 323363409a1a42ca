//! In-memory connect cluster served through wiremock

#![allow(dead_code)]

use kafka_connect::{ClusterConfig, KafkaConnect};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Debug, Clone)]
struct StoredConnector {
    config: HashMap<String, String>,
    state: &'static str,
}

impl StoredConnector {
    fn task_count(&self) -> u32 {
        self.config
            .get("tasks.max")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Default)]
struct State {
    connectors: BTreeMap<String, StoredConnector>,
    rebalancing: bool,
}

/// A stateful fake of the control API
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl FakeCluster {
    /// Start a mock server answering every request from this fake
    pub async fn start() -> (Self, MockServer) {
        let fake = Self::default();
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (fake, server)
    }

    pub fn client(server: &MockServer) -> KafkaConnect {
        KafkaConnect::new(&ClusterConfig::from_url(&server.uri()).unwrap()).unwrap()
    }

    /// Make restart calls answer 409 until cleared
    pub fn set_rebalancing(&self, rebalancing: bool) {
        self.state.lock().unwrap().rebalancing = rebalancing;
    }

    /// Change a config key behind the client's back
    pub fn external_update(&self, name: &str, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        let connector = state.connectors.get_mut(name).expect("connector exists");
        connector.config.insert(key.to_string(), value.to_string());
    }

    /// Remove a connector behind the client's back
    pub fn external_delete(&self, name: &str) {
        self.state.lock().unwrap().connectors.remove(name);
    }

    pub fn connector_state(&self, name: &str) -> Option<&'static str> {
        self.state
            .lock()
            .unwrap()
            .connectors
            .get(name)
            .map(|c| c.state)
    }
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error_code": status,
        "message": message
    }))
}

fn detail(name: &str, connector: &StoredConnector) -> Value {
    let tasks: Vec<Value> = (0..connector.task_count())
        .map(|task| json!({"connector": name, "task": task}))
        .collect();
    json!({
        "name": name,
        "config": connector.config,
        "tasks": tasks,
        "type": "source"
    })
}

impl Respond for FakeCluster {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|s| {
                s.filter(|s| !s.is_empty())
                    .map(|s| urlencoding::decode(s).unwrap().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let mut state = self.state.lock().unwrap();

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", []) => ResponseTemplate::new(200).set_body_json(json!({
                "version": "3.7.0",
                "commit": "2ae524ed625438c5",
                "kafka_cluster_id": "fake-cluster"
            })),
            ("GET", ["connector-plugins"]) => ResponseTemplate::new(200).set_body_json(json!([
                {"class": "org.apache.kafka.connect.file.FileStreamSourceConnector", "type": "source", "version": "3.7.0"}
            ])),
            ("GET", ["connectors"]) => {
                let names: Vec<&String> = state.connectors.keys().collect();
                ResponseTemplate::new(200).set_body_json(names)
            }
            (method, ["connectors", name, rest @ ..]) => {
                let name = name.to_string();
                if method == "PUT" && rest == ["config"] {
                    let config: HashMap<String, String> =
                        match serde_json::from_slice(&request.body) {
                            Ok(config) => config,
                            Err(e) => return error(400, &e.to_string()),
                        };
                    if !config.contains_key("connector.class") {
                        return error(400, "Connector config contains no connector type");
                    }
                    let created = !state.connectors.contains_key(&name);
                    let stored = state
                        .connectors
                        .entry(name.clone())
                        .or_insert(StoredConnector {
                            config: HashMap::new(),
                            state: "RUNNING",
                        });
                    stored.config = config;
                    let body = detail(&name, stored);
                    return ResponseTemplate::new(if created { 201 } else { 200 })
                        .set_body_json(body);
                }

                let rebalancing = state.rebalancing;
                let Some(connector) = state.connectors.get_mut(&name) else {
                    return error(404, &format!("Connector {name} not found"));
                };

                match (method, rest) {
                    ("GET", []) => ResponseTemplate::new(200).set_body_json(detail(&name, connector)),
                    ("GET", ["config"]) => {
                        ResponseTemplate::new(200).set_body_json(&connector.config)
                    }
                    ("GET", ["status"]) => {
                        let tasks: Vec<Value> = (0..connector.task_count())
                            .map(|id| json!({"id": id, "state": connector.state, "worker_id": "fake:8083"}))
                            .collect();
                        ResponseTemplate::new(200).set_body_json(json!({
                            "name": name,
                            "connector": {"state": connector.state, "worker_id": "fake:8083"},
                            "tasks": tasks,
                            "type": "source"
                        }))
                    }
                    ("PUT", ["pause"]) => {
                        connector.state = "PAUSED";
                        ResponseTemplate::new(202)
                    }
                    ("PUT", ["resume"]) => {
                        connector.state = "RUNNING";
                        ResponseTemplate::new(202)
                    }
                    ("POST", ["restart"]) | ("POST", ["tasks", _, "restart"]) if rebalancing => {
                        error(409, "Cannot complete request because of a conflicting operation (e.g. worker rebalance)")
                    }
                    ("POST", ["restart"]) => ResponseTemplate::new(204),
                    ("GET", ["tasks"]) => {
                        let tasks: Vec<Value> = (0..connector.task_count())
                            .map(|task| {
                                json!({
                                    "id": {"connector": name, "task": task},
                                    "config": {"task.class": "FileStreamSourceTask"}
                                })
                            })
                            .collect();
                        ResponseTemplate::new(200).set_body_json(tasks)
                    }
                    ("GET", ["tasks", id, "status"]) | ("POST", ["tasks", id, "restart"]) => {
                        match id.parse::<u32>() {
                            Ok(id) if id < connector.task_count() => {
                                if method == "POST" {
                                    ResponseTemplate::new(204)
                                } else {
                                    ResponseTemplate::new(200).set_body_json(json!({
                                        "id": id,
                                        "state": connector.state,
                                        "worker_id": "fake:8083"
                                    }))
                                }
                            }
                            _ => error(404, &format!("Task {name}-{id} not found")),
                        }
                    }
                    ("DELETE", []) => {
                        state.connectors.remove(&name);
                        ResponseTemplate::new(204)
                    }
                    _ => error(405, "HTTP 405 Method Not Allowed"),
                }
            }
            _ => error(404, "HTTP 404 Not Found"),
        }
    }
}
