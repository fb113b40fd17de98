//! Execution coordinator
//!
//! Launches each submitted workflow as an independent background task,
//! tracks the spawned tasks in a supervised registry, and exposes the
//! query operations over the shared state store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::{
    Config, ExecutionState, ExecutionSummary, ExtractedSummary, PlanSummary, Result, SubmitReceipt,
};
use crate::engine::driver::{SimulatedDriver, UiDriver};
use crate::engine::executor::StepExecutor;
use crate::engine::store::ExecutionStore;
use crate::planner::{self, PlanGenerator};
use crate::vision::{UiPerception, VisionProbe};

/// Coordinates concurrent workflow executions
///
/// Submissions never block on execution: the coordinator registers state,
/// spawns the step executor, and returns the execution id immediately.
pub struct Coordinator {
    store: Arc<ExecutionStore>,
    planner: Arc<dyn PlanGenerator>,
    driver: Arc<dyn UiDriver>,
    perception: Arc<dyn UiPerception>,
    /// In-flight executions by id, for supervision and reset
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator with explicit collaborators
    pub fn new(
        planner: Arc<dyn PlanGenerator>,
        driver: Arc<dyn UiDriver>,
        perception: Arc<dyn UiPerception>,
    ) -> Self {
        Self {
            store: Arc::new(ExecutionStore::new()),
            planner,
            driver,
            perception,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a coordinator from configuration
    ///
    /// Probes for the vision helper and picks the plan backend (Gemini when
    /// an API key is configured, the template backend otherwise).
    pub async fn from_config(config: &Config) -> Self {
        let perception = VisionProbe::detect(config).await;
        Self::new(
            planner::from_config(config),
            Arc::new(SimulatedDriver::from_config(&config.engine)),
            Arc::new(perception),
        )
    }

    /// Submit a natural-language request as a new workflow execution
    ///
    /// Plan generation failures surface here and register nothing. On
    /// success the execution starts in the background and the receipt with
    /// the fresh id returns immediately.
    pub async fn submit(&self, request: &str) -> Result<SubmitReceipt> {
        let plan = self.planner.generate_plan(request).await?;

        let id = format!("wf_{}", Uuid::new_v4());
        self.store.register(&id, plan.clone());
        let receipt = SubmitReceipt::new(&id, &plan);

        tracing::info!(
            workflow_id = %id,
            planner = self.planner.name(),
            steps = plan.steps.len(),
            "Workflow submitted"
        );

        let executor = StepExecutor::new(
            self.store.clone(),
            self.driver.clone(),
            self.perception.clone(),
        );
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            executor.run(&task_id, plan).await;
        });

        let mut tasks = self.tasks.lock().expect("task registry lock poisoned");
        tasks.retain(|_, handle| !handle.is_finished());
        tasks.insert(id, handle);

        Ok(receipt)
    }

    /// Get the live state of one execution
    pub fn status(&self, id: &str) -> Result<ExecutionState> {
        self.store.state(id)
    }

    /// List registered plans, most recently submitted first
    pub fn list_plans(&self) -> Vec<PlanSummary> {
        self.store.list_plans()
    }

    /// List executions, running first, then by descending progress
    pub fn list_executions(&self) -> Vec<ExecutionSummary> {
        self.store.list_executions()
    }

    /// List extracted data, most recently added first
    pub fn list_extracted(&self) -> Vec<ExtractedSummary> {
        self.store.list_extracted()
    }

    /// Clear all workflow state
    ///
    /// Aborts every tracked in-flight execution before clearing the store;
    /// a task past its abort point stops at its next store update (see
    /// [`ExecutionStore::clear`]).
    pub fn reset(&self) {
        let mut tasks = self.tasks.lock().expect("task registry lock poisoned");
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
        drop(tasks);

        self.store.clear();
        tracing::info!("All workflow state cleared");
    }

    /// Wait for one execution's background task to finish
    pub async fn wait(&self, id: &str) {
        let handle = {
            let mut tasks = self.tasks.lock().expect("task registry lock poisoned");
            tasks.remove(id)
        };
        if let Some(handle) = handle {
            // JoinError only means the task was aborted by reset
            let _ = handle.await;
        }
    }

    /// Submit a request and block until its execution reaches a terminal state
    ///
    /// Used by the one-shot CLI mode and tests; HTTP callers poll instead.
    pub async fn run_to_completion(&self, request: &str) -> Result<ExecutionState> {
        let receipt = self.submit(request).await?;
        self.wait(&receipt.workflow_id).await;
        self.status(&receipt.workflow_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AutoflowError, ExecutionStatus, WorkflowPlan};
    use crate::planner::TemplatePlanner;
    use async_trait::async_trait;

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

    fn test_coordinator() -> Coordinator {
        Coordinator::new(
            Arc::new(TemplatePlanner::new()),
            Arc::new(SimulatedDriver::new(0, 0)),
            Arc::new(VisionProbe::disabled()),
        )
    }

    #[tokio::test]
    async fn test_submit_returns_receipt_immediately() {
        let coordinator = test_coordinator();
        let receipt = coordinator.submit("log in and extract").await.unwrap();

        assert!(receipt.workflow_id.starts_with("wf_"));
        assert_eq!(receipt.status, "started");
        assert_eq!(receipt.steps.len(), 5);
        assert!(receipt.steps.iter().all(|s| s.status == "pending"));

        // state is queryable right away
        assert!(coordinator.status(&receipt.workflow_id).is_ok());
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let coordinator = test_coordinator();
        let state = coordinator
            .run_to_completion("log in and extract the data table")
            .await
            .unwrap();

        assert_eq!(state.status, ExecutionStatus::Completed);
        assert_eq!(state.progress, 100);
        assert_eq!(state.steps.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_plan_generation_registers_nothing() {
        let coordinator = Coordinator::new(
            Arc::new(FailingPlanner),
            Arc::new(SimulatedDriver::new(0, 0)),
            Arc::new(VisionProbe::disabled()),
        );

        let result = coordinator.submit("anything").await;
        assert!(matches!(result, Err(AutoflowError::PlanGeneration(_))));
        assert!(coordinator.list_executions().is_empty());
        assert!(coordinator.list_plans().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_all_listings() {
        let coordinator = test_coordinator();
        let state = coordinator.run_to_completion("extract data").await.unwrap();
        assert_eq!(state.status, ExecutionStatus::Completed);

        coordinator.reset();
        assert!(coordinator.list_plans().is_empty());
        assert!(coordinator.list_executions().is_empty());
        assert!(coordinator.list_extracted().is_empty());
    }

    #[tokio::test]
    async fn test_status_for_unknown_id() {
        let coordinator = test_coordinator();
        assert!(matches!(
            coordinator.status("wf_missing"),
            Err(AutoflowError::NotFound(_))
        ));
    }
}
