//! Shared types used across Autoflow modules
//!
//! Contains the workflow step model, execution state, and the summary
//! shapes returned by the listing operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single UI interaction within a workflow plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    /// Load a page or view
    Navigate,
    /// Type a value into a field
    Input,
    /// Click an element
    Click,
    /// Pull data out of an element
    Extract,
    /// Wait for an element or condition
    Wait,
    /// Scroll the page
    Scroll,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepAction::Navigate => write!(f, "navigate"),
            StepAction::Input => write!(f, "input"),
            StepAction::Click => write!(f, "click"),
            StepAction::Extract => write!(f, "extract"),
            StepAction::Wait => write!(f, "wait"),
            StepAction::Scroll => write!(f, "scroll"),
        }
    }
}

/// One atomic instruction in a workflow plan
///
/// Immutable once the plan is registered with the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// The kind of UI interaction to perform
    pub action: StepAction,
    /// The element or location the action applies to
    pub target: String,
    /// Value to enter (input steps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Key to store extracted data under (extract steps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_as: Option<String>,
    /// Whether the value is sensitive (passwords etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<bool>,
    /// Human-readable description of the step
    pub description: String,
}

impl Step {
    /// Create a new step
    pub fn new(
        action: StepAction,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action,
            target: target.into(),
            value: None,
            save_as: None,
            sensitive: None,
            description: description.into(),
        }
    }

    /// Set the value to enter
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the extraction key
    pub fn with_save_as(mut self, key: impl Into<String>) -> Self {
        self.save_as = Some(key.into());
        self
    }

    /// Mark the value as sensitive
    pub fn with_sensitive(mut self) -> Self {
        self.sensitive = Some(true);
        self
    }
}

/// A structured workflow derived from a natural-language request
///
/// Created once per submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPlan {
    /// Plan name
    pub name: String,
    /// What the workflow does
    pub description: String,
    /// Ordered steps to perform
    pub steps: Vec<Step>,
}

/// Lifecycle status of one execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Registered but not yet started (kept for wire compatibility;
    /// the engine begins execution immediately on submit)
    Pending,
    /// Steps are being driven
    Running,
    /// All steps succeeded
    Completed,
    /// A step failed; remaining steps were not attempted
    Failed,
}

impl ExecutionStatus {
    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Pending => write!(f, "pending"),
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Action name of the step
    pub step: String,
    /// Step outcome (always "completed"; a failing step terminates
    /// the execution instead of producing a result entry)
    pub status: String,
    /// What was done
    pub details: String,
}

impl StepResult {
    /// Record a completed step
    pub fn completed(action: StepAction, target: &str) -> Self {
        Self {
            step: action.to_string(),
            status: "completed".to_string(),
            details: format!("Executed {} on {}", action, target),
        }
    }
}

/// Live progress of one workflow execution
///
/// Mutated exclusively by the step executor driving the execution;
/// read by any number of concurrent status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Current lifecycle status
    pub status: ExecutionStatus,
    /// Percent complete, 0-100, non-decreasing
    pub progress: u8,
    /// The step currently being performed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<Step>,
    /// Results of the steps executed so far, in plan order
    pub steps: Vec<StepResult>,
    /// Terminal result message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Whether UI perception was available to this execution
    pub vision_enabled: bool,
    /// When the execution was registered
    pub started_at: DateTime<Utc>,
    /// When the execution reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionState {
    /// Initial state at submission time
    pub fn started() -> Self {
        Self {
            status: ExecutionStatus::Running,
            progress: 0,
            current_step: None,
            steps: Vec::new(),
            result: None,
            vision_enabled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// One piece of data captured by an extract step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Whether this is simulated sample data
    pub sample: bool,
    /// Where the data came from
    pub detail: String,
}

/// Plan overview returned by the workflow listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub workflow_id: String,
    pub name: String,
    pub description: String,
    pub steps_count: usize,
}

/// Execution overview returned by the execution listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_step: Option<Step>,
    pub steps_completed: usize,
}

/// Extracted-data overview returned by the extraction listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSummary {
    pub workflow_id: String,
    pub data: HashMap<String, ExtractionRecord>,
}

/// Preview entry for a not-yet-executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepPreview {
    /// Action name of the step
    pub step: String,
    /// Always "pending" at submission time
    pub status: String,
}

impl StepPreview {
    /// Preview a planned step
    pub fn pending(step: &Step) -> Self {
        Self {
            step: step.action.to_string(),
            status: "pending".to_string(),
        }
    }
}

/// Synchronous response to a workflow submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Fresh execution identifier
    pub workflow_id: String,
    /// Always "started"
    pub status: String,
    /// Pending preview of the planned steps
    pub steps: Vec<StepPreview>,
}

impl SubmitReceipt {
    /// Build the submission response for a registered plan
    pub fn new(workflow_id: impl Into<String>, plan: &WorkflowPlan) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            status: "started".to_string(),
            steps: plan.steps.iter().map(StepPreview::pending).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_action_serde_names() {
        let json = serde_json::to_string(&StepAction::Navigate).unwrap();
        assert_eq!(json, "\"navigate\"");

        let action: StepAction = serde_json::from_str("\"extract\"").unwrap();
        assert_eq!(action, StepAction::Extract);
        assert_eq!(action.to_string(), "extract");
    }

    #[test]
    fn test_initial_execution_state() {
        let state = ExecutionState::started();
        assert_eq!(state.status, ExecutionStatus::Running);
        assert_eq!(state.progress, 0);
        assert!(state.steps.is_empty());
        assert!(state.result.is_none());
        assert!(state.finished_at.is_none());
    }

    #[test]
    fn test_step_result_details() {
        let result = StepResult::completed(StepAction::Click, "login_button");
        assert_eq!(result.step, "click");
        assert_eq!(result.status, "completed");
        assert_eq!(result.details, "Executed click on login_button");
    }

    #[test]
    fn test_submit_receipt_previews_all_steps() {
        let plan = WorkflowPlan {
            name: "Test".to_string(),
            description: "Test plan".to_string(),
            steps: vec![
                Step::new(StepAction::Navigate, "login_page", "Open login page"),
                Step::new(StepAction::Click, "login_button", "Click login"),
            ],
        };

        let receipt = SubmitReceipt::new("wf_1", &plan);
        assert_eq!(receipt.status, "started");
        assert_eq!(receipt.steps.len(), 2);
        assert_eq!(receipt.steps[0].step, "navigate");
        assert!(receipt.steps.iter().all(|s| s.status == "pending"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(!ExecutionStatus::Pending.is_terminal());
    }
}
