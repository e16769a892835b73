use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::applications::workflow;
use crate::auth::{AuthUser, Role};
use crate::errors::{conflict_on_unique_violation, AppError};
use crate::models::application::{
    ApplicationDetail, ApplicationForCompany, ApplicationRow, ApplicationStatus,
    ApplicationWithApplicant, ApplicationWithPosting,
};
use crate::state::AppState;

const ALREADY_APPLIED: &str = "You have already applied to this posting";

/// Candidate-facing lists surface the most promising applications first;
/// unscored rows sort below every scored one, ties break by recency.
const CANDIDATE_ORDER: &str = "ORDER BY a.ai_score DESC NULLS LAST, a.submitted_at DESC";

const APPLICANT_SUMMARY_COLUMNS: &str = "ap.tax_id AS applicant_tax_id, \
     ap.name AS applicant_name, ap.email AS applicant_email, ap.phone AS applicant_phone, \
     ap.cv_url AS applicant_cv_url, ap.linkedin_url AS applicant_linkedin_url, \
     ap.skills AS applicant_skills, ap.years_experience AS applicant_years_experience";

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub posting_id: Uuid,
    pub answers: Option<Value>,
}

/// POST /applications — the applicant id always comes from the token.
///
/// The response returns as soon as the row is persisted; the evaluation
/// trigger runs in a detached task and never delays or fails the submit.
pub async fn handle_submit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    if user.role != Role::Applicant {
        return Err(AppError::Forbidden);
    }

    let posting: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM postings WHERE id = $1")
        .bind(req.posting_id)
        .fetch_optional(&state.db)
        .await?;
    if posting.is_none() {
        return Err(AppError::NotFound(format!(
            "Posting {} not found",
            req.posting_id
        )));
    }

    // Pre-check for the common case; the unique index is the real guard
    // against two identical submissions racing past this SELECT.
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM applications WHERE applicant_id = $1 AND posting_id = $2")
            .bind(user.id)
            .bind(req.posting_id)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(ALREADY_APPLIED.to_string()));
    }

    let application: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications (applicant_id, posting_id, answers)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(req.posting_id)
    .bind(&req.answers)
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique_violation(e, ALREADY_APPLIED))?;

    let application_id = application.id;
    let task_state = state.clone();
    tokio::spawn(async move {
        workflow::run_evaluation(task_state, application_id).await;
    });

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /applications/posting/:id
pub async fn handle_list_by_posting(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(posting_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationWithApplicant>>, AppError> {
    let applications: Vec<ApplicationWithApplicant> = sqlx::query_as(&format!(
        r#"
        SELECT a.*, {APPLICANT_SUMMARY_COLUMNS}
        FROM applications a
        JOIN applicants ap ON ap.id = a.applicant_id
        WHERE a.posting_id = $1
        {CANDIDATE_ORDER}
        "#,
    ))
    .bind(posting_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// GET /applications/applicant/:id
pub async fn handle_list_by_applicant(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(applicant_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationWithPosting>>, AppError> {
    let applications: Vec<ApplicationWithPosting> = sqlx::query_as(
        r#"
        SELECT a.*, p.title AS posting_title, p.status AS posting_status,
               c.id AS company_id, c.name AS company_name, c.logo_url AS company_logo_url
        FROM applications a
        JOIN postings p ON p.id = a.posting_id
        JOIN companies c ON c.id = p.company_id
        WHERE a.applicant_id = $1
        ORDER BY a.submitted_at DESC
        "#,
    )
    .bind(applicant_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// GET /applications/company/:id — everything submitted to any of the
/// company's postings.
pub async fn handle_list_by_company(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationForCompany>>, AppError> {
    let applications: Vec<ApplicationForCompany> = sqlx::query_as(&format!(
        r#"
        SELECT a.*, ap.tax_id AS applicant_tax_id, ap.name AS applicant_name,
               ap.email AS applicant_email, ap.phone AS applicant_phone,
               ap.linkedin_url AS applicant_linkedin_url,
               ap.years_experience AS applicant_years_experience,
               p.title AS posting_title
        FROM applications a
        JOIN applicants ap ON ap.id = a.applicant_id
        JOIN postings p ON p.id = a.posting_id
        WHERE p.company_id = $1
        {CANDIDATE_ORDER}
        "#,
    ))
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// GET /applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let application: Option<ApplicationDetail> = sqlx::query_as(&format!(
        r#"
        SELECT a.*, {APPLICANT_SUMMARY_COLUMNS},
               p.title AS posting_title, p.status AS posting_status,
               c.id AS company_id, c.name AS company_name, c.logo_url AS company_logo_url
        FROM applications a
        JOIN applicants ap ON ap.id = a.applicant_id
        JOIN postings p ON p.id = a.posting_id
        JOIN companies c ON c.id = p.company_id
        WHERE a.id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    application
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// Score values arrive as numbers from typed callers and as strings from
/// the evaluation callback; both coerce to the same column type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Number(f64),
    Text(String),
}

pub fn coerce_score(input: &ScoreInput) -> Result<f64, AppError> {
    match input {
        ScoreInput::Number(n) => Ok(*n),
        ScoreInput::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation(format!("ai_score '{s}' is not a number"))),
    }
}

/// Validates a requested status. Unknown values are dropped (logged, not
/// applied) rather than rejected — partial-update callers depend on it.
pub fn sanitize_status(requested: &str) -> Option<&'static str> {
    match ApplicationStatus::parse(requested) {
        Some(status) => Some(status.as_str()),
        None => {
            warn!("Ignoring unknown application status '{requested}'");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub ai_score: Option<ScoreInput>,
    pub ai_feedback: Option<String>,
    pub status: Option<String>,
    pub answers: Option<Value>,
}

/// PATCH /applications/:id — the loose update used by the evaluation
/// callback. Each field is validated and coerced independently.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let ai_score = req.ai_score.as_ref().map(coerce_score).transpose()?;
    let status = req.status.as_deref().and_then(sanitize_status);

    let application: Option<ApplicationRow> = sqlx::query_as(
        r#"
        UPDATE applications SET
            ai_score = COALESCE($2, ai_score),
            ai_feedback = COALESCE($3, ai_feedback),
            status = COALESCE($4, status),
            answers = COALESCE($5, answers)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(ai_score)
    .bind(&req.ai_feedback)
    .bind(status)
    .bind(&req.answers)
    .fetch_optional(&state.db)
    .await?;

    application
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /applications/:id/status — unknown values leave the row unchanged.
pub async fn handle_update_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let current: Option<ApplicationRow> = sqlx::query_as("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let current = current.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    let Some(status) = sanitize_status(&req.status) else {
        return Ok(Json(current));
    };

    let application: ApplicationRow =
        sqlx::query_as("UPDATE applications SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(application))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_score_from_number() {
        let score = coerce_score(&ScoreInput::Number(87.0)).expect("coerce");
        assert_eq!(score, 87.0);
    }

    #[test]
    fn test_coerce_score_from_numeric_string() {
        let score = coerce_score(&ScoreInput::Text(" 72.5 ".into())).expect("coerce");
        assert_eq!(score, 72.5);
    }

    #[test]
    fn test_coerce_score_rejects_garbage() {
        assert!(coerce_score(&ScoreInput::Text("high".into())).is_err());
    }

    #[test]
    fn test_score_input_deserializes_both_shapes() {
        let from_number: ScoreInput = serde_json::from_str("87").expect("number");
        let from_string: ScoreInput = serde_json::from_str("\"87\"").expect("string");
        assert_eq!(coerce_score(&from_number).expect("n"), 87.0);
        assert_eq!(coerce_score(&from_string).expect("s"), 87.0);
    }

    #[test]
    fn test_sanitize_status_accepts_allowed_values() {
        for s in ["pending", "in_review", "evaluated", "rejected", "selected"] {
            assert_eq!(sanitize_status(s), Some(s));
        }
    }

    #[test]
    fn test_sanitize_status_drops_unknown_values() {
        assert_eq!(sanitize_status("archived"), None);
        assert_eq!(sanitize_status("SELECTED"), None);
    }

    #[test]
    fn test_candidate_order_puts_null_scores_last() {
        assert!(CANDIDATE_ORDER.contains("NULLS LAST"));
        assert!(CANDIDATE_ORDER.contains("submitted_at DESC"));
    }
}
