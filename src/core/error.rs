//! Custom error types for Autoflow
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Autoflow operations
#[derive(Error, Debug)]
pub enum AutoflowError {
    /// Plan generation failures (model unreachable, unusable response)
    #[error("Plan generation error: {0}")]
    PlanGeneration(String),

    /// Unknown workflow/execution identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failures while performing a workflow step
    #[error("Step execution error: {0}")]
    StepExecution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server bootstrap errors
    #[error("Server error: {0}")]
    Server(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Autoflow operations
pub type Result<T> = std::result::Result<T, AutoflowError>;

impl AutoflowError {
    /// Create a plan generation error
    pub fn plan(msg: impl Into<String>) -> Self {
        Self::PlanGeneration(msg.into())
    }

    /// Create a not-found error for a workflow id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a step execution error
    pub fn step(msg: impl Into<String>) -> Self {
        Self::StepExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a server error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }
}

impl axum::response::IntoResponse for AutoflowError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AutoflowError::NotFound(_) => StatusCode::NOT_FOUND,
            AutoflowError::PlanGeneration(_) => StatusCode::BAD_GATEWAY,
            AutoflowError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
