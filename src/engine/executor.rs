//! Step executor
//!
//! Drives exactly one execution's plan from first to last step, in order,
//! updating the store after each step. The first failing step halts the
//! execution; there is no retry of steps or of the workflow.

use chrono::Utc;
use std::sync::Arc;

use crate::core::{
    AutoflowError, ExecutionStatus, ExtractionRecord, Result, Step, StepAction, StepResult,
    WorkflowPlan,
};
use crate::engine::driver::UiDriver;
use crate::engine::store::ExecutionStore;
use crate::vision::UiPerception;

/// Default key under which extract steps store their data
const DEFAULT_EXTRACT_KEY: &str = "extracted_data";

/// Executes the steps of a single workflow against the UI driver
pub struct StepExecutor {
    store: Arc<ExecutionStore>,
    driver: Arc<dyn UiDriver>,
    perception: Arc<dyn UiPerception>,
}

impl StepExecutor {
    /// Create a new step executor
    pub fn new(
        store: Arc<ExecutionStore>,
        driver: Arc<dyn UiDriver>,
        perception: Arc<dyn UiPerception>,
    ) -> Self {
        Self {
            store,
            driver,
            perception,
        }
    }

    /// Run one execution to a terminal state
    ///
    /// Never returns an error: step failures become terminal `failed` state,
    /// and a store cleared mid-run stops the executor without writing.
    pub async fn run(&self, id: &str, plan: WorkflowPlan) {
        let vision = self.perception.available();
        tracing::info!(
            workflow_id = %id,
            steps = plan.steps.len(),
            "Starting workflow execution"
        );

        match self.drive(id, &plan).await {
            Ok(()) => {
                let finished = self.store.update(id, |state| {
                    state.status = ExecutionStatus::Completed;
                    state.progress = 100;
                    state.result = Some("Workflow executed successfully".to_string());
                    state.vision_enabled = vision;
                    state.finished_at = Some(Utc::now());
                });
                match finished {
                    Ok(()) => tracing::info!(workflow_id = %id, "Workflow completed"),
                    Err(_) => {
                        tracing::debug!(workflow_id = %id, "State cleared mid-run, result discarded")
                    }
                }
            }
            Err(AutoflowError::NotFound(_)) => {
                // reset() happened underneath us; stop writing
                tracing::debug!(workflow_id = %id, "State cleared mid-run, stopping");
            }
            Err(e) => {
                let message = e.to_string();
                let _ = self.store.update(id, |state| {
                    state.status = ExecutionStatus::Failed;
                    state.result = Some(message);
                    state.vision_enabled = vision;
                    state.finished_at = Some(Utc::now());
                });
                tracing::warn!(workflow_id = %id, error = %e, "Workflow failed");
            }
        }
    }

    /// Drive all steps in order, updating the store after each one
    async fn drive(&self, id: &str, plan: &WorkflowPlan) -> Result<()> {
        let total = plan.steps.len();

        for (index, step) in plan.steps.iter().enumerate() {
            let position = index + 1;
            let progress = (position * 100 / std::cmp::max(total, 1)) as u8;

            let current = step.clone();
            self.store.update(id, move |state| {
                state.progress = progress;
                state.current_step = Some(current);
            })?;

            tracing::debug!(
                workflow_id = %id,
                step = %step.action,
                target = %step.target,
                progress,
                "Executing step"
            );

            let extracted = self.perform(step).await?;

            if let Some(detail) = extracted {
                let key = step.save_as.as_deref().unwrap_or(DEFAULT_EXTRACT_KEY);
                self.store.add_extracted(
                    id,
                    key,
                    ExtractionRecord {
                        sample: true,
                        detail,
                    },
                )?;
            }

            let result = StepResult::completed(step.action, &step.target);
            self.store.update(id, move |state| {
                state.steps.push(result);
            })?;
        }

        Ok(())
    }

    /// Perform one step's side effect through the driver
    ///
    /// Returns the extraction detail for extract steps, `None` otherwise.
    async fn perform(&self, step: &Step) -> Result<Option<String>> {
        match step.action {
            StepAction::Navigate => {
                self.driver.navigate(&step.target).await?;
                Ok(None)
            }
            StepAction::Input => {
                self.driver
                    .input(
                        &step.target,
                        step.value.as_deref(),
                        step.sensitive.unwrap_or(false),
                    )
                    .await?;
                Ok(None)
            }
            StepAction::Click => {
                self.driver.click(&step.target).await?;
                Ok(None)
            }
            StepAction::Extract => {
                let detail = if self.perception.available() {
                    self.perception.describe(&step.target).await?
                } else {
                    self.driver.extract(&step.target).await?
                };
                Ok(Some(detail))
            }
            StepAction::Wait => {
                self.driver.wait(&step.target).await?;
                Ok(None)
            }
            StepAction::Scroll => {
                self.driver.scroll(&step.target).await?;
                Ok(None)
            }
        }
    }
}
