use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::auth::token::Role;
use crate::errors::AppError;
use crate::models::applicant::ApplicantRow;
use crate::models::company::CompanyRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Principal,
}

/// Redacted principal returned alongside the token. Never carries the hash.
#[derive(Debug, Serialize)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// POST /auth/login/company
pub async fn handle_login_company(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let company: Option<CompanyRow> = sqlx::query_as("SELECT * FROM companies WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Unknown email and wrong password must be indistinguishable.
    let company = company.ok_or(AppError::Unauthorized)?;
    if !verify_password(&req.password, &company.password_hash).unwrap_or(false) {
        return Err(AppError::Unauthorized);
    }

    let access_token = state
        .tokens
        .issue(company.id, &company.email, Role::Company)?;

    Ok(Json(LoginResponse {
        access_token,
        user: Principal {
            id: company.id,
            name: company.name,
            email: company.email,
            role: Role::Company,
        },
    }))
}

/// POST /auth/login/applicant
pub async fn handle_login_applicant(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let applicant: Option<ApplicantRow> =
        sqlx::query_as("SELECT * FROM applicants WHERE email = $1")
            .bind(&req.email)
            .fetch_optional(&state.db)
            .await?;

    let applicant = applicant.ok_or(AppError::Unauthorized)?;
    if !verify_password(&req.password, &applicant.password_hash).unwrap_or(false) {
        return Err(AppError::Unauthorized);
    }

    let access_token = state
        .tokens
        .issue(applicant.id, &applicant.email, Role::Applicant)?;

    Ok(Json(LoginResponse {
        access_token,
        user: Principal {
            id: applicant.id,
            name: applicant.name,
            email: applicant.email,
            role: Role::Applicant,
        },
    }))
}
