//! Template plan generator
//!
//! Produces the standard login-and-extract workflow without calling any
//! external model. Used when no API key is configured, as the fallback for
//! unusable model output, and as the deterministic backend in tests.

use async_trait::async_trait;

use crate::core::{Result, Step, StepAction, WorkflowPlan};
use crate::planner::PlanGenerator;

/// Plan generator backed by a fixed workflow template
#[derive(Debug, Clone, Default)]
pub struct TemplatePlanner;

impl TemplatePlanner {
    /// Create a new template planner
    pub fn new() -> Self {
        Self
    }

    /// Build the standard login-and-extract plan for a request
    pub fn plan_for(request: &str) -> WorkflowPlan {
        WorkflowPlan {
            name: "Generated Workflow".to_string(),
            description: request.to_string(),
            steps: vec![
                Step::new(StepAction::Navigate, "login_page", "Navigate to login page"),
                Step::new(StepAction::Input, "username", "Enter username")
                    .with_value("{{username}}"),
                Step::new(StepAction::Input, "password", "Enter password")
                    .with_value("{{password}}")
                    .with_sensitive(),
                Step::new(StepAction::Click, "login_button", "Click login button"),
                Step::new(StepAction::Extract, "data_table", "Extract data from table")
                    .with_save_as("extracted_data"),
            ],
        }
    }
}

#[async_trait]
impl PlanGenerator for TemplatePlanner {
    async fn generate_plan(&self, request: &str) -> Result<WorkflowPlan> {
        Ok(Self::plan_for(request))
    }

    fn name(&self) -> &str {
        "template"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_template_plan_shape() {
        let plan = TemplatePlanner::new()
            .generate_plan("log in and extract the data table")
            .await
            .unwrap();

        assert_eq!(plan.description, "log in and extract the data table");
        assert_eq!(plan.steps.len(), 5);
        assert_eq!(plan.steps[0].action, StepAction::Navigate);
        assert_eq!(plan.steps[4].action, StepAction::Extract);
        assert_eq!(plan.steps[4].save_as.as_deref(), Some("extracted_data"));
        assert_eq!(plan.steps[2].sensitive, Some(true));
    }
}
