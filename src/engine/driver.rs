//! UI interaction driver
//!
//! The step executor dispatches each step action through the [`UiDriver`]
//! trait; a real browser backend would implement it against an automation
//! CLI or protocol. The shipped [`SimulatedDriver`] stands in for real
//! interaction with a non-blocking per-step delay.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::core::config::EngineConfig;
use crate::core::{AutoflowError, Result};

/// Trait for UI interaction backends, one method per step action
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Load a page or named view
    async fn navigate(&self, target: &str) -> Result<()>;

    /// Type a value into a field
    async fn input(&self, target: &str, value: Option<&str>, sensitive: bool) -> Result<()>;

    /// Click an element
    async fn click(&self, target: &str) -> Result<()>;

    /// Pull data out of an element, returning a description of what was read
    async fn extract(&self, target: &str) -> Result<String>;

    /// Wait for an element or condition
    async fn wait(&self, target: &str) -> Result<()>;

    /// Scroll to or past an element
    async fn scroll(&self, target: &str) -> Result<()>;
}

/// Driver that simulates UI interaction with a timed delay
pub struct SimulatedDriver {
    delay: Duration,
    jitter_ms: u64,
}

impl SimulatedDriver {
    /// Create a driver with explicit timing
    pub fn new(delay_ms: u64, jitter_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            jitter_ms,
        }
    }

    /// Create a driver from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.step_delay_ms, config.jitter_ms)
    }

    /// Simulate the time one interaction takes
    async fn interact(&self) {
        let jitter = if self.jitter_ms > 0 {
            // rng is not Send; keep it out of the await
            rand::rng().random_range(0..=self.jitter_ms)
        } else {
            0
        };
        sleep(self.delay + Duration::from_millis(jitter)).await;
    }
}

#[async_trait]
impl UiDriver for SimulatedDriver {
    async fn navigate(&self, target: &str) -> Result<()> {
        // Absolute URLs must at least parse; named views pass through
        if target.starts_with("http://") || target.starts_with("https://") {
            url::Url::parse(target)
                .map_err(|e| AutoflowError::step(format!("invalid URL {}: {}", target, e)))?;
        }
        self.interact().await;
        Ok(())
    }

    async fn input(&self, _target: &str, _value: Option<&str>, _sensitive: bool) -> Result<()> {
        self.interact().await;
        Ok(())
    }

    async fn click(&self, _target: &str) -> Result<()> {
        self.interact().await;
        Ok(())
    }

    async fn extract(&self, target: &str) -> Result<String> {
        self.interact().await;
        Ok(format!("Extracted from {}", target))
    }

    async fn wait(&self, _target: &str) -> Result<()> {
        self.interact().await;
        Ok(())
    }

    async fn scroll(&self, _target: &str) -> Result<()> {
        self.interact().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_driver() -> SimulatedDriver {
        SimulatedDriver::new(0, 0)
    }

    #[tokio::test]
    async fn test_navigate_accepts_named_views_and_urls() {
        let driver = instant_driver();
        assert!(driver.navigate("login_page").await.is_ok());
        assert!(driver.navigate("https://example.com/login").await.is_ok());
    }

    #[tokio::test]
    async fn test_navigate_rejects_malformed_urls() {
        let driver = instant_driver();
        let err = driver.navigate("http://").await.unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }

    #[tokio::test]
    async fn test_extract_reports_source() {
        let driver = instant_driver();
        let detail = driver.extract("data_table").await.unwrap();
        assert_eq!(detail, "Extracted from data_table");
    }
}
