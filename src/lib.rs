//! Autoflow - Natural-Language Browser Workflow Engine
//!
//! A Rust backend that turns free-text automation requests into structured
//! browser workflows and executes them asynchronously, tracking progress and
//! extracted data across many concurrent executions.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Planner**: Plan generation behind a trait, with Gemini and template backends
//! - **Engine**: State store, step executor, and execution coordinator
//! - **Vision**: Optional UI perception capability
//! - **Server**: Thin axum HTTP surface over the coordinator
//!
//! # Usage
//!
//! ```rust,no_run
//! use autoflow::engine::Coordinator;
//! use autoflow::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let coordinator = Coordinator::from_config(&Config::load()).await;
//!
//!     let receipt = coordinator
//!         .submit("log in and extract the data table")
//!         .await
//!         .unwrap();
//!     let state = coordinator.status(&receipt.workflow_id).unwrap();
//!     println!("{}: {}", receipt.workflow_id, state.status);
//! }
//! ```

pub mod core;
pub mod engine;
pub mod planner;
pub mod server;
pub mod vision;

// Re-export commonly used items
pub use core::{AutoflowError, Config, Result};
pub use engine::Coordinator;
