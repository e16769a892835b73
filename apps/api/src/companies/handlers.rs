use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::{AuthUser, Role};
use crate::errors::{conflict_on_unique_violation, AppError};
use crate::models::company::{CompanyPublic, COMPANY_PUBLIC_COLUMNS, STATUS_INACTIVE};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "Email is already registered";

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub tax_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

fn validate_registration(req: &CreateCompanyRequest) -> Result<(), AppError> {
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
    Ok(())
}

/// POST /companies
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyPublic>), AppError> {
    validate_registration(&req)?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM companies WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let company: CompanyPublic = sqlx::query_as(&format!(
        r#"
        INSERT INTO companies (tax_id, name, email, password_hash, description, logo_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COMPANY_PUBLIC_COLUMNS}
        "#,
    ))
    .bind(&req.tax_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.description)
    .bind(&req.logo_url)
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique_violation(e, EMAIL_TAKEN))?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /companies
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyPublic>>, AppError> {
    let companies: Vec<CompanyPublic> = sqlx::query_as(&format!(
        "SELECT {COMPANY_PUBLIC_COLUMNS} FROM companies ORDER BY created_at DESC"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(companies))
}

/// GET /companies/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyPublic>, AppError> {
    let company: Option<CompanyPublic> = sqlx::query_as(&format!(
        "SELECT {COMPANY_PUBLIC_COLUMNS} FROM companies WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    company
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}

/// PATCH /companies/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyPublic>, AppError> {
    if user.role != Role::Company || user.id != id {
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

    let company: Option<CompanyPublic> = sqlx::query_as(&format!(
        r#"
        UPDATE companies SET
            tax_id = COALESCE($2, tax_id),
            name = COALESCE($3, name),
            email = COALESCE($4, email),
            password_hash = COALESCE($5, password_hash),
            description = COALESCE($6, description),
            logo_url = COALESCE($7, logo_url)
        WHERE id = $1
        RETURNING {COMPANY_PUBLIC_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(&req.tax_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.description)
    .bind(&req.logo_url)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| conflict_on_unique_violation(e, EMAIL_TAKEN))?;

    company
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}

/// DELETE /companies/:id — soft delete, the row stays.
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyPublic>, AppError> {
    if user.role != Role::Company || user.id != id {
        return Err(AppError::Forbidden);
    }

    let company: Option<CompanyPublic> = sqlx::query_as(&format!(
        "UPDATE companies SET status = $2 WHERE id = $1 RETURNING {COMPANY_PUBLIC_COLUMNS}"
    ))
    .bind(id)
    .bind(STATUS_INACTIVE)
    .fetch_optional(&state.db)
    .await?;

    company
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}
