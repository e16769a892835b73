use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::{AuthUser, Role};
use crate::errors::{conflict_on_unique_violation, AppError};
use crate::models::applicant::{ApplicantPublic, APPLICANT_PUBLIC_COLUMNS};
use crate::models::company::STATUS_INACTIVE;
use crate::state::AppState;

const EMAIL_TAKEN: &str = "Email is already registered";

#[derive(Debug, Deserialize)]
pub struct CreateApplicantRequest {
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub skills: Option<Value>,
    pub years_experience: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicantRequest {
    pub tax_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub cv_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub skills: Option<Value>,
    pub years_experience: Option<i32>,
}

fn validate_registration(req: &CreateApplicantRequest) -> Result<(), AppError> {
    if req.tax_id.trim().is_empty() || req.name.trim().is_empty() {
        return Err(AppError::Validation(
            "tax_id and name must not be empty".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    if matches!(req.years_experience, Some(years) if years < 0) {
        return Err(AppError::Validation(
            "years_experience must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// POST /applicants
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateApplicantRequest>,
) -> Result<(StatusCode, Json<ApplicantPublic>), AppError> {
    validate_registration(&req)?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM applicants WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let applicant: ApplicantPublic = sqlx::query_as(&format!(
        r#"
        INSERT INTO applicants
            (tax_id, name, email, password_hash, phone, linkedin_url, skills, years_experience)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {APPLICANT_PUBLIC_COLUMNS}
        "#,
    ))
    .bind(&req.tax_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.phone)
    .bind(&req.linkedin_url)
    .bind(&req.skills)
    .bind(req.years_experience)
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique_violation(e, EMAIL_TAKEN))?;

    Ok((StatusCode::CREATED, Json(applicant)))
}

/// GET /applicants
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicantPublic>>, AppError> {
    let applicants: Vec<ApplicantPublic> = sqlx::query_as(&format!(
        "SELECT {APPLICANT_PUBLIC_COLUMNS} FROM applicants ORDER BY created_at DESC"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applicants))
}

/// GET /applicants/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicantPublic>, AppError> {
    let applicant: Option<ApplicantPublic> = sqlx::query_as(&format!(
        "SELECT {APPLICANT_PUBLIC_COLUMNS} FROM applicants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    applicant
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Applicant {id} not found")))
}

/// PATCH /applicants/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicantRequest>,
) -> Result<Json<ApplicantPublic>, AppError> {
    if user.role != Role::Applicant || user.id != id {
        return Err(AppError::Forbidden);
    }

    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(AppError::Validation("email is not valid".to_string()));
        }
    }
    let password_hash = match &req.password {
        Some(password) if password.len() < 6 => {
            return Err(AppError::Validation(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let applicant: Option<ApplicantPublic> = sqlx::query_as(&format!(
        r#"
        UPDATE applicants SET
            tax_id = COALESCE($2, tax_id),
            name = COALESCE($3, name),
            email = COALESCE($4, email),
            password_hash = COALESCE($5, password_hash),
            phone = COALESCE($6, phone),
            cv_url = COALESCE($7, cv_url),
            linkedin_url = COALESCE($8, linkedin_url),
            skills = COALESCE($9, skills),
            years_experience = COALESCE($10, years_experience)
        WHERE id = $1
        RETURNING {APPLICANT_PUBLIC_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(&req.tax_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.phone)
    .bind(&req.cv_url)
    .bind(&req.linkedin_url)
    .bind(&req.skills)
    .bind(req.years_experience)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| conflict_on_unique_violation(e, EMAIL_TAKEN))?;

    applicant
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Applicant {id} not found")))
}

/// DELETE /applicants/:id — soft delete, the row stays.
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicantPublic>, AppError> {
    if user.role != Role::Applicant || user.id != id {
        return Err(AppError::Forbidden);
    }

    let applicant: Option<ApplicantPublic> = sqlx::query_as(&format!(
        "UPDATE applicants SET status = $2 WHERE id = $1 RETURNING {APPLICANT_PUBLIC_COLUMNS}"
    ))
    .bind(id)
    .bind(STATUS_INACTIVE)
    .fetch_optional(&state.db)
    .await?;

    applicant
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Applicant {id} not found")))
}

/// Persists the résumé URL on the applicant after a storage upload.
pub async fn update_cv_url(
    db: &sqlx::PgPool,
    applicant_id: Uuid,
    cv_url: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE applicants SET cv_url = $2 WHERE id = $1")
        .bind(applicant_id)
        .bind(cv_url)
        .execute(db)
        .await?;
    Ok(())
}
