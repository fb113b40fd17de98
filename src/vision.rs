//! UI perception port
//!
//! Optional external capability for inspecting a rendered interface. The
//! engine only depends on the capability flag and a describe hook; when the
//! helper binary is missing the engine still runs with vision disabled.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::{AutoflowError, Config, Result};

/// Trait for UI perception backends
#[async_trait]
pub trait UiPerception: Send + Sync {
    /// Whether the perception capability is usable
    fn available(&self) -> bool;

    /// Describe what a target element looks like on the current page
    async fn describe(&self, target: &str) -> Result<String>;
}

/// Perception backend that shells out to an external vision helper
pub struct VisionProbe {
    helper: String,
    available: bool,
}

impl VisionProbe {
    /// Probe for the configured vision helper binary
    pub async fn detect(config: &Config) -> Self {
        let helper = config.vision.helper.clone();
        let available = config.vision.enabled && Self::helper_responds(&helper).await;

        if available {
            tracing::info!(helper = %helper, "UI vision helper detected");
        } else {
            tracing::info!("UI vision unavailable, executions run without perception");
        }

        Self { helper, available }
    }

    /// A probe that always reports vision as unavailable
    pub fn disabled() -> Self {
        Self {
            helper: String::new(),
            available: false,
        }
    }

    /// Check if the helper binary answers a version query
    async fn helper_responds(helper: &str) -> bool {
        Command::new(helper)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl UiPerception for VisionProbe {
    fn available(&self) -> bool {
        self.available
    }

    async fn describe(&self, target: &str) -> Result<String> {
        if !self.available {
            return Err(AutoflowError::step("vision helper not available"));
        }

        let output = Command::new(&self.helper)
            .args(["describe", target])
            .output()
            .await
            .map_err(|e| AutoflowError::step(format!("vision helper failed: {}", e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(AutoflowError::step(format!(
                "vision helper failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )))
        }
    }
}
