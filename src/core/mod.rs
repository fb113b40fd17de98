//! Core module - shared infrastructure for Autoflow
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{AutoflowError, Result};
pub use types::*;
