//! Detached evaluation of a freshly submitted application.
//!
//! The submit handler spawns [`run_evaluation`] and never awaits it: the
//! applicant's response must not wait out the evaluator's 30 s window.
//! Failure handling is a single chain — try primary, on any failure try
//! fallback, on any failure log and stop. No retries, no backoff. If both
//! legs die the application simply stays `pending` with a null score until
//! someone looks at it.

use anyhow::Result;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::evaluator::ScoreRequest;
use crate::models::application::{ApplicationStatus, EvaluationContext};
use crate::state::AppState;

/// Error boundary for the detached task. Nothing escapes to the submitter.
pub async fn run_evaluation(state: AppState, application_id: Uuid) {
    if let Err(err) = state.evaluator.trigger_workflow(application_id).await {
        warn!("Primary evaluation trigger failed for application {application_id}: {err}");
        if let Err(err) = fallback_evaluate(&state, application_id).await {
            error!("Fallback evaluation failed for application {application_id}: {err}");
        }
    }
}

/// Scores the application through the direct API and records the outcome.
/// The scoring client degrades to a neutral default instead of failing, so
/// the only error path left here is the database itself.
async fn fallback_evaluate(state: &AppState, application_id: Uuid) -> Result<()> {
    let context: Option<EvaluationContext> = sqlx::query_as(
        r#"
        SELECT a.posting_id, a.answers, ap.cv_url, ap.skills, p.requirements
        FROM applications a
        JOIN applicants ap ON ap.id = a.applicant_id
        JOIN postings p ON p.id = a.posting_id
        WHERE a.id = $1
        "#,
    )
    .bind(application_id)
    .fetch_optional(&state.db)
    .await?;

    let Some(context) = context else {
        warn!("Application {application_id} vanished before fallback evaluation");
        return Ok(());
    };

    let result = state
        .evaluator
        .score(&ScoreRequest {
            cv_url: context.cv_url.unwrap_or_default(),
            answers: context.answers.unwrap_or(Value::Null),
            posting_id: context.posting_id,
            requirements: context.requirements.unwrap_or_default(),
            skills: context.skills.unwrap_or(Value::Null),
        })
        .await;

    sqlx::query("UPDATE applications SET ai_score = $2, ai_feedback = $3, status = $4 WHERE id = $1")
        .bind(application_id)
        .bind(result.score)
        .bind(&result.feedback)
        .bind(ApplicationStatus::Evaluated.as_str())
        .execute(&state.db)
        .await?;

    info!(
        "Application {application_id} evaluated via fallback: score {}",
        result.score
    );
    Ok(())
}
