//! Execution state store
//!
//! Concurrency-safe in-memory store for plan definitions, live execution
//! state, and extracted data. The store is the only shared mutable resource
//! in the engine; every operation takes the lock for a single map access and
//! never holds it across an await point.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::core::{
    AutoflowError, ExecutionState, ExecutionStatus, ExecutionSummary, ExtractedSummary,
    ExtractionRecord, PlanSummary, Result, WorkflowPlan,
};

/// Registered plan plus its submission order
struct PlanEntry {
    plan: WorkflowPlan,
    seq: u64,
}

/// Extracted data for one execution plus its last-insert order
struct ExtractedEntry {
    data: HashMap<String, ExtractionRecord>,
    seq: u64,
}

#[derive(Default)]
struct StoreInner {
    plans: HashMap<String, PlanEntry>,
    executions: HashMap<String, ExecutionState>,
    extracted: HashMap<String, ExtractedEntry>,
}

/// Concurrency-safe store of all workflow state
///
/// Mutations are atomic per call: a reader never observes a partially
/// applied update. See [`ExecutionStore::clear`] for how in-flight
/// executions interact with a reset.
#[derive(Default)]
pub struct ExecutionStore {
    inner: RwLock<StoreInner>,
    seq: AtomicU64,
}

impl ExecutionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Register a new execution: its plan and its initial state
    pub fn register(&self, id: &str, plan: WorkflowPlan) {
        let seq = self.next_seq();
        let mut inner = self.inner.write().expect("execution store lock poisoned");
        inner.plans.insert(id.to_string(), PlanEntry { plan, seq });
        inner
            .executions
            .insert(id.to_string(), ExecutionState::started());
    }

    /// Get a snapshot of one execution's state
    pub fn state(&self, id: &str) -> Result<ExecutionState> {
        let inner = self.inner.read().expect("execution store lock poisoned");
        inner
            .executions
            .get(id)
            .cloned()
            .ok_or_else(|| AutoflowError::not_found(format!("Execution {} not found", id)))
    }

    /// Apply a mutation to one execution's state atomically
    ///
    /// Returns `NotFound` when the id is absent, which is how an in-flight
    /// executor learns the store was cleared underneath it.
    pub fn update<F>(&self, id: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut ExecutionState),
    {
        let mut inner = self.inner.write().expect("execution store lock poisoned");
        match inner.executions.get_mut(id) {
            Some(state) => {
                mutate(state);
                Ok(())
            }
            None => Err(AutoflowError::not_found(format!(
                "Execution {} not found",
                id
            ))),
        }
    }

    /// Record data captured by an extract step
    pub fn add_extracted(&self, id: &str, key: &str, record: ExtractionRecord) -> Result<()> {
        let seq = self.next_seq();
        let mut inner = self.inner.write().expect("execution store lock poisoned");

        if !inner.executions.contains_key(id) {
            return Err(AutoflowError::not_found(format!(
                "Execution {} not found",
                id
            )));
        }

        let entry = inner
            .extracted
            .entry(id.to_string())
            .or_insert_with(|| ExtractedEntry {
                data: HashMap::new(),
                seq,
            });
        entry.data.insert(key.to_string(), record);
        entry.seq = seq;
        Ok(())
    }

    /// Get the extracted data recorded for one execution
    pub fn extracted(&self, id: &str) -> Option<HashMap<String, ExtractionRecord>> {
        let inner = self.inner.read().expect("execution store lock poisoned");
        inner.extracted.get(id).map(|e| e.data.clone())
    }

    /// Snapshot of all registered plans, most recently submitted first
    pub fn list_plans(&self) -> Vec<PlanSummary> {
        let inner = self.inner.read().expect("execution store lock poisoned");
        let mut entries: Vec<(&String, &PlanEntry)> = inner.plans.iter().collect();
        entries.sort_by(|a, b| b.1.seq.cmp(&a.1.seq));
        entries
            .into_iter()
            .map(|(id, entry)| PlanSummary {
                workflow_id: id.clone(),
                name: entry.plan.name.clone(),
                description: entry.plan.description.clone(),
                steps_count: entry.plan.steps.len(),
            })
            .collect()
    }

    /// Snapshot of all executions, running first, then by descending progress
    pub fn list_executions(&self) -> Vec<ExecutionSummary> {
        let inner = self.inner.read().expect("execution store lock poisoned");
        let mut items: Vec<ExecutionSummary> = inner
            .executions
            .iter()
            .map(|(id, state)| ExecutionSummary {
                workflow_id: id.clone(),
                status: state.status,
                progress: state.progress,
                last_step: state.current_step.clone(),
                steps_completed: state.steps.len(),
            })
            .collect();
        items.sort_by_key(|item| {
            (
                item.status != ExecutionStatus::Running,
                std::cmp::Reverse(item.progress),
            )
        });
        items
    }

    /// Snapshot of all extracted data, most recently added first
    pub fn list_extracted(&self) -> Vec<ExtractedSummary> {
        let inner = self.inner.read().expect("execution store lock poisoned");
        let mut entries: Vec<(&String, &ExtractedEntry)> = inner.extracted.iter().collect();
        entries.sort_by(|a, b| b.1.seq.cmp(&a.1.seq));
        entries
            .into_iter()
            .map(|(id, entry)| ExtractedSummary {
                workflow_id: id.clone(),
                data: entry.data.clone(),
            })
            .collect()
    }

    /// Remove all plans, executions, and extracted data atomically
    ///
    /// An update that acquired the write lock before `clear` completes fully
    /// and is then discarded with everything else; an update arriving after
    /// `clear` finds its id gone and gets `NotFound`, which executors treat
    /// as a stop signal. Writes are never partially visible either way.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("execution store lock poisoned");
        inner.plans.clear();
        inner.executions.clear();
        inner.extracted.clear();
    }
}
