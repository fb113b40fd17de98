//! Plan generation - turns natural language into structured workflows
//!
//! The engine treats plan generation as an external capability behind the
//! [`PlanGenerator`] trait. The Gemini-backed implementation is used when an
//! API key is configured; the template planner covers offline use and tests.

mod gemini;
mod template;

pub use gemini::GeminiPlanner;
pub use template::TemplatePlanner;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{Config, Result, WorkflowPlan};

/// Trait for plan-generation backends
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Convert a natural-language request into a structured workflow plan
    async fn generate_plan(&self, request: &str) -> Result<WorkflowPlan>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// Pick a plan generator based on configuration
///
/// Gemini when an API key is available, the template backend otherwise.
pub fn from_config(config: &Config) -> Arc<dyn PlanGenerator> {
    match config.gemini.api_key {
        Some(_) => Arc::new(GeminiPlanner::from_config(config)),
        None => Arc::new(TemplatePlanner::new()),
    }
}
