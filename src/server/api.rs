//! Workflow API handlers
//!
//! POST /api/workflows/execute       - Submit a natural-language workflow
//! GET  /api/workflows               - List registered plans
//! GET  /api/workflows/{id}/status   - Live state of one execution
//! GET  /api/executions              - List executions
//! GET  /api/executions/{id}         - One execution's state
//! GET  /api/extracted               - List extracted data
//! POST /api/reset                   - Clear all workflow state

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::core::{AutoflowError, ExecutionState, SubmitReceipt};
use crate::server::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/workflows/execute", post(execute_workflow))
        .route("/workflows", get(list_workflows))
        .route("/workflows/{id}/status", get(workflow_status))
        .route("/executions", get(list_executions))
        .route("/executions/{id}", get(get_execution))
        .route("/extracted", get(list_extracted))
        .route("/reset", post(reset_all))
}

#[derive(Debug, Deserialize)]
struct WorkflowRequest {
    description: String,
    /// Caller-supplied variables; carried for API compatibility
    #[serde(default)]
    #[allow(dead_code)]
    parameters: Option<serde_json::Value>,
}

/// POST /api/workflows/execute — Submit a workflow and start it
async fn execute_workflow(
    State(state): State<AppState>,
    Json(body): Json<WorkflowRequest>,
) -> Result<Json<SubmitReceipt>, AutoflowError> {
    let receipt = state.submit(&body.description).await?;
    Ok(Json(receipt))
}

/// GET /api/workflows — List registered plans
async fn list_workflows(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "items": state.list_plans() }))
}

/// GET /api/workflows/{id}/status — Live state of one execution
async fn workflow_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionState>, AutoflowError> {
    Ok(Json(state.status(&id)?))
}

/// GET /api/executions — List executions
async fn list_executions(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "items": state.list_executions() }))
}

/// GET /api/executions/{id} — One execution's state
async fn get_execution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionState>, AutoflowError> {
    Ok(Json(state.status(&id)?))
}

/// GET /api/extracted — List extracted data
async fn list_extracted(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "items": state.list_extracted() }))
}

/// POST /api/reset — Clear all workflow state
async fn reset_all(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.reset();
    Json(serde_json::json!({ "status": "cleared" }))
}
