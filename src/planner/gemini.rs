//! Gemini plan generator
//!
//! Async HTTP client for the Gemini generateContent API. The model is asked
//! for a JSON workflow; if its answer cannot be parsed as one, the template
//! plan is used so a reachable backend never fails a submission.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{AutoflowError, Config, Result, WorkflowPlan};
use crate::planner::{PlanGenerator, TemplatePlanner};

/// Gemini API client for plan generation
#[derive(Clone)]
pub struct GeminiPlanner {
    client: Client,
    url: String,
    api_key: String,
}

/// generateContent request
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

/// generateContent response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiPlanner {
    /// Create a new Gemini planner from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: config.gemini_url(),
            api_key: config.gemini.api_key.clone().unwrap_or_default(),
        }
    }

    /// Build the plan-generation prompt for a user request
    fn build_prompt(request: &str) -> String {
        format!(
            r#"You are a workflow automation assistant. Convert the user's request into a structured workflow.

User request: {}

Respond with a JSON object of this shape:
{{
    "name": "Generated Workflow",
    "description": "Brief description of the workflow",
    "steps": [
        {{"action": "navigate", "target": "target_element", "description": "what this step does"}},
        {{"action": "input", "target": "input_field", "value": "{{{{variable_name}}}}", "description": "what this step does"}},
        {{"action": "click", "target": "button_element", "description": "what this step does"}},
        {{"action": "extract", "target": "data_element", "save_as": "variable_name", "description": "what this step does"}}
    ]
}}

Available actions: navigate, input, click, extract, wait, scroll
Use appropriate actions based on the user's request."#,
            request
        )
    }

    /// Pull a JSON object out of model text, tolerating code fences and prose
    fn extract_json(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end > start {
            Some(&text[start..=end])
        } else {
            None
        }
    }

    /// Parse model output into a plan, falling back to the template
    fn parse_plan(request: &str, text: &str) -> WorkflowPlan {
        let parsed = Self::extract_json(text)
            .and_then(|json| serde_json::from_str::<WorkflowPlan>(json).ok());

        match parsed {
            Some(plan) if !plan.steps.is_empty() => plan,
            _ => {
                tracing::warn!("Unusable plan from model, using template plan");
                TemplatePlanner::plan_for(request)
            }
        }
    }
}

#[async_trait]
impl PlanGenerator for GeminiPlanner {
    async fn generate_plan(&self, request: &str) -> Result<WorkflowPlan> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: Self::build_prompt(request),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AutoflowError::plan(format!("Failed to parse workflow: {}", e)))?;

        if !response.status().is_success() {
            return Err(AutoflowError::plan(format!(
                "Failed to parse workflow: Gemini returned {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AutoflowError::plan(format!("Failed to parse workflow: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default();

        Ok(Self::parse_plan(request, text))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
