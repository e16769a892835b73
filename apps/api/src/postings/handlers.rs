use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{AuthUser, Role};
use crate::errors::AppError;
use crate::models::posting::{
    ContractType, PostingRow, PostingStatus, PostingWithCompany, PostingWithCount, WorkMode,
};
use crate::state::AppState;

/// Columns for the posting-with-company-summary projection.
const POSTING_WITH_COMPANY_COLUMNS: &str = "p.id, p.company_id, p.title, p.description, \
     p.contract_type, p.location, p.work_mode, p.estimated_salary, p.screening_questions, \
     p.requirements, p.closes_at, p.status, p.published_at, \
     c.tax_id AS company_tax_id, c.name AS company_name, c.logo_url AS company_logo_url";

#[derive(Debug, Deserialize)]
pub struct CreatePostingRequest {
    pub title: String,
    pub description: String,
    pub contract_type: String,
    pub location: String,
    pub work_mode: String,
    pub estimated_salary: Option<i64>,
    pub screening_questions: Option<Value>,
    pub requirements: Option<String>,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub contract_type: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub estimated_salary: Option<i64>,
    pub screening_questions: Option<Value>,
    pub requirements: Option<String>,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

fn require_contract_type(s: &str) -> Result<(), AppError> {
    ContractType::parse(s)
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Unknown contract type '{s}'")))
}

fn require_work_mode(s: &str) -> Result<(), AppError> {
    WorkMode::parse(s)
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Unknown work mode '{s}'")))
}

async fn load_posting(state: &AppState, id: Uuid) -> Result<PostingRow, AppError> {
    let posting: Option<PostingRow> = sqlx::query_as("SELECT * FROM postings WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    posting.ok_or_else(|| AppError::NotFound(format!("Posting {id} not found")))
}

/// POST /postings — the owning company is always the caller.
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreatePostingRequest>,
) -> Result<(StatusCode, Json<PostingRow>), AppError> {
    if user.role != Role::Company {
        return Err(AppError::Forbidden);
    }
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "title and description must not be empty".to_string(),
        ));
    }
    require_contract_type(&req.contract_type)?;
    require_work_mode(&req.work_mode)?;

    let posting: PostingRow = sqlx::query_as(
        r#"
        INSERT INTO postings
            (company_id, title, description, contract_type, location, work_mode,
             estimated_salary, screening_questions, requirements, closes_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.contract_type)
    .bind(&req.location)
    .bind(&req.work_mode)
    .bind(req.estimated_salary)
    .bind(&req.screening_questions)
    .bind(&req.requirements)
    .bind(req.closes_at)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(posting)))
}

/// GET /postings?status=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PostingWithCompany>>, AppError> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            PostingStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown posting status '{s}'")))?,
        ),
        None => None,
    };

    let postings: Vec<PostingWithCompany> = sqlx::query_as(&format!(
        r#"
        SELECT {POSTING_WITH_COMPANY_COLUMNS}
        FROM postings p
        JOIN companies c ON c.id = p.company_id
        WHERE $1::TEXT IS NULL OR p.status = $1
        ORDER BY p.published_at DESC
        "#,
    ))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(postings))
}

/// GET /postings/company/:id
pub async fn handle_list_by_company(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<PostingWithCount>>, AppError> {
    let postings: Vec<PostingWithCount> = sqlx::query_as(
        r#"
        SELECT p.*,
               (SELECT COUNT(*) FROM applications a WHERE a.posting_id = p.id)
                   AS application_count
        FROM postings p
        WHERE p.company_id = $1
        ORDER BY p.published_at DESC
        "#,
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(postings))
}

/// GET /postings/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostingWithCompany>, AppError> {
    let posting: Option<PostingWithCompany> = sqlx::query_as(&format!(
        r#"
        SELECT {POSTING_WITH_COMPANY_COLUMNS}
        FROM postings p
        JOIN companies c ON c.id = p.company_id
        WHERE p.id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    posting
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Posting {id} not found")))
}

/// PATCH /postings/:id — owner only. Status is not patchable; closing goes
/// through DELETE.
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostingRequest>,
) -> Result<Json<PostingRow>, AppError> {
    let posting = load_posting(&state, id).await?;
    if user.role != Role::Company || posting.company_id != user.id {
        return Err(AppError::Forbidden);
    }

    if let Some(contract_type) = &req.contract_type {
        require_contract_type(contract_type)?;
    }
    if let Some(work_mode) = &req.work_mode {
        require_work_mode(work_mode)?;
    }

    let posting: PostingRow = sqlx::query_as(
        r#"
        UPDATE postings SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            contract_type = COALESCE($4, contract_type),
            location = COALESCE($5, location),
            work_mode = COALESCE($6, work_mode),
            estimated_salary = COALESCE($7, estimated_salary),
            screening_questions = COALESCE($8, screening_questions),
            requirements = COALESCE($9, requirements),
            closes_at = COALESCE($10, closes_at)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.contract_type)
    .bind(&req.location)
    .bind(&req.work_mode)
    .bind(req.estimated_salary)
    .bind(&req.screening_questions)
    .bind(&req.requirements)
    .bind(req.closes_at)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(posting))
}

/// DELETE /postings/:id — one-way status flip to closed, idempotent.
pub async fn handle_close(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostingRow>, AppError> {
    let posting = load_posting(&state, id).await?;
    if user.role != Role::Company || posting.company_id != user.id {
        return Err(AppError::Forbidden);
    }

    let posting: PostingRow =
        sqlx::query_as("UPDATE postings SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(PostingStatus::Closed.as_str())
            .fetch_one(&state.db)
            .await?;

    Ok(Json(posting))
}
