//! HTTP API integration tests
//!
//! Boots the axum server on an ephemeral port with a deterministic
//! coordinator and drives it the way the frontend does.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use async_trait::async_trait;
use autoflow::core::{AutoflowError, Config, Result, WorkflowPlan};
use autoflow::engine::{Coordinator, SimulatedDriver};
use autoflow::planner::{PlanGenerator, TemplatePlanner};
use autoflow::server;
use autoflow::vision::VisionProbe;
use serde_json::Value;

/// Start a server bound to an ephemeral port, returning its base URL
async fn spawn_server(coordinator: Coordinator) -> String {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;

    let addr = server::start_server_with_state(&config, Arc::new(coordinator))
        .await
        .expect("server should start");
    format!("http://{}", addr)
}

fn fast_coordinator() -> Coordinator {
    Coordinator::new(
        Arc::new(TemplatePlanner::new()),
        Arc::new(SimulatedDriver::new(1, 0)),
        Arc::new(VisionProbe::disabled()),
    )
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_server(fast_coordinator()).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_submit_poll_and_extract_flow() {
    let base = spawn_server(fast_coordinator()).await;
    let client = reqwest::Client::new();

    // submit
    let receipt: Value = client
        .post(format!("{}/api/workflows/execute", base))
        .json(&serde_json::json!({
            "description": "log in and extract the data table"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let id = receipt["workflow_id"].as_str().unwrap().to_string();
    assert!(id.starts_with("wf_"));
    assert_eq!(receipt["status"], "started");
    assert_eq!(receipt["steps"].as_array().unwrap().len(), 5);
    assert!(receipt["steps"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["status"] == "pending"));

    // poll until completed
    let state = timeout(Duration::from_secs(10), async {
        loop {
            let state: Value = client
                .get(format!("{}/api/workflows/{}/status", base, id))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if state["status"] == "completed" || state["status"] == "failed" {
                return state;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("workflow did not finish");

    assert_eq!(state["status"], "completed");
    assert_eq!(state["progress"], 100);
    assert_eq!(state["steps"].as_array().unwrap().len(), 5);
    assert_eq!(state["result"], "Workflow executed successfully");
    assert_eq!(state["vision_enabled"], false);

    // plan listing
    let plans: Value = client
        .get(format!("{}/api/workflows", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plans["items"].as_array().unwrap().len(), 1);
    assert_eq!(plans["items"][0]["workflow_id"], id.as_str());
    assert_eq!(plans["items"][0]["steps_count"], 5);

    // execution listing and single fetch
    let executions: Value = client
        .get(format!("{}/api/executions", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(executions["items"][0]["status"], "completed");

    let single = client
        .get(format!("{}/api/executions/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(single.status(), 200);

    // extracted data
    let extracted: Value = client
        .get(format!("{}/api/extracted", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        extracted["items"][0]["data"]["extracted_data"]["sample"],
        true
    );

    // reset
    let cleared: Value = client
        .post(format!("{}/api/reset", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["status"], "cleared");

    for path in ["/api/workflows", "/api/executions", "/api/extracted"] {
        let body: Value = client
            .get(format!("{}{}", base, path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(body["items"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_execution_returns_404() {
    let base = spawn_server(fast_coordinator()).await;

    let response = reqwest::get(format!("{}/api/executions/wf_missing", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("wf_missing"));
}

struct FailingPlanner;

#[async_trait]
impl PlanGenerator for FailingPlanner {
    async fn generate_plan(&self, _request: &str) -> Result<WorkflowPlan> {
        Err(AutoflowError::plan("model unreachable"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[tokio::test]
async fn test_plan_failure_surfaces_as_bad_gateway() {
    let coordinator = Coordinator::new(
        Arc::new(FailingPlanner),
        Arc::new(SimulatedDriver::new(1, 0)),
        Arc::new(VisionProbe::disabled()),
    );
    let base = spawn_server(coordinator).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/workflows/execute", base))
        .json(&serde_json::json!({ "description": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    // nothing was registered
    let executions: Value = client
        .get(format!("{}/api/executions", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(executions["items"].as_array().unwrap().is_empty());
}
