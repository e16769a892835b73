//! Evaluator client — the single point of entry for both external
//! evaluation services: the workflow-automation webhook (primary) and the
//! direct scoring API (fallback).
//!
//! Neither call may ever surface an error to the applicant who submitted:
//! the webhook path reports failure to the caller inside the detached task,
//! and the scoring path degrades to a fixed neutral score instead of erring.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Both evaluators are bounded by the same window.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Neutral score substituted when the scoring API is unreachable or errors.
pub const DEFAULT_SCORE: f64 = 50.0;
pub const DEFAULT_FEEDBACK: &str =
    "Automatic evaluation unavailable. Pending manual review.";

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Evaluator returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Payload for the direct scoring API. The wire names are the scoring
/// service's own contract and are kept as-is.
#[derive(Debug, Serialize)]
pub struct ScoreRequest {
    pub cv_url: String,
    #[serde(rename = "respuestas_json")]
    pub answers: Value,
    #[serde(rename = "vacante_id")]
    pub posting_id: Uuid,
    #[serde(rename = "requisitos")]
    pub requirements: String,
    pub skills: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "puntaje_ia")]
    pub score: f64,
    pub feedback: String,
}

impl ScoreResult {
    /// The explicit recovery policy when scoring fails: a neutral score and
    /// a message flagging the application for manual review.
    pub fn neutral_default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            feedback: DEFAULT_FEEDBACK.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct EvaluatorClient {
    client: Client,
    webhook_url: String,
    scoring_base_url: String,
}

impl EvaluatorClient {
    pub fn new(webhook_url: String, scoring_base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            webhook_url,
            scoring_base_url,
        }
    }

    /// Fires the primary workflow webhook with the application id. Any
    /// failure (timeout, non-2xx, network) is an error for the detached
    /// task to route into the fallback — never for the submitter.
    pub async fn trigger_workflow(&self, application_id: Uuid) -> Result<(), EvaluatorError> {
        info!("Triggering evaluation workflow for application {application_id}");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "applicationId": application_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Evaluation workflow accepted application {application_id}");
        Ok(())
    }

    /// Calls the direct scoring API. Infallible by policy: any failure
    /// degrades to [`ScoreResult::neutral_default`] so the application
    /// still ends up evaluated rather than stuck.
    pub async fn score(&self, request: &ScoreRequest) -> ScoreResult {
        let url = format!("{}/api/evaluar", self.scoring_base_url.trim_end_matches('/'));

        let response = match self.client.post(&url).json(request).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Scoring API unreachable: {e}");
                return ScoreResult::neutral_default();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Scoring API returned status {status}");
            return ScoreResult::neutral_default();
        }

        match response.json::<ScoreResult>().await {
            Ok(result) => result,
            Err(e) => {
                warn!("Scoring API returned an unparseable body: {e}");
                ScoreResult::neutral_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> EvaluatorClient {
        // Nothing listens on port 9; both calls fail fast without a network.
        EvaluatorClient::new(
            "http://127.0.0.1:9/webhook/analyze-application".to_string(),
            "http://127.0.0.1:9".to_string(),
        )
    }

    #[tokio::test]
    async fn test_trigger_failure_is_an_error() {
        let client = unreachable_client();
        let result = client.trigger_workflow(Uuid::new_v4()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_score_degrades_to_neutral_default() {
        let client = unreachable_client();
        let result = client
            .score(&ScoreRequest {
                cv_url: String::new(),
                answers: Value::Null,
                posting_id: Uuid::new_v4(),
                requirements: String::new(),
                skills: Value::Null,
            })
            .await;

        assert_eq!(result.score, DEFAULT_SCORE);
        assert_eq!(result.feedback, DEFAULT_FEEDBACK);
    }

    #[test]
    fn test_score_result_parses_wire_names() {
        let result: ScoreResult =
            serde_json::from_str(r#"{"puntaje_ia": 87, "feedback": "Strong match"}"#)
                .expect("parse");
        assert_eq!(result.score, 87.0);
        assert_eq!(result.feedback, "Strong match");
    }
}
