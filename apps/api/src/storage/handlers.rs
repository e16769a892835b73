use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::applicants::handlers::update_cv_url;
use crate::auth::{AuthUser, Role};
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage;

/// POST /storage/upload-cv — multipart with a single `file` field.
/// The stored URL is also persisted on the caller's applicant record.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    if user.role != Role::Applicant {
        return Err(AppError::Forbidden);
    }

    let mut file: Option<(Bytes, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/pdf")
                .to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
            file = Some((content, content_type));
        }
    }

    let Some((content, content_type)) = file else {
        return Err(AppError::Validation("No file provided".to_string()));
    };

    // Replacing a résumé: drop the previous object, best-effort. A stale
    // object must never block the new upload.
    let previous: Option<(Option<String>,)> =
        sqlx::query_as("SELECT cv_url FROM applicants WHERE id = $1")
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;
    if let Some((Some(old_url),)) = previous {
        if let Err(err) = storage::remove_cv(&state.s3, &state.config.s3_bucket, &old_url).await {
            tracing::warn!("Failed to remove previous résumé {old_url}: {err}");
        }
    }

    let cv_url = storage::upload_cv(
        &state.s3,
        &state.config.s3_bucket,
        &state.config.s3_endpoint,
        user.id,
        content,
        &content_type,
    )
    .await?;

    update_cv_url(&state.db, user.id, &cv_url).await?;

    Ok(Json(json!({
        "message": "CV uploaded successfully",
        "cv_url": cv_url,
    })))
}
