pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applicants::handlers as applicants;
use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::companies::handlers as companies;
use crate::postings::handlers as postings;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/auth/login/company", post(auth::handle_login_company))
        .route("/auth/login/applicant", post(auth::handle_login_applicant))
        // Companies
        .route(
            "/companies",
            post(companies::handle_create).get(companies::handle_list),
        )
        .route(
            "/companies/:id",
            get(companies::handle_get)
                .patch(companies::handle_update)
                .delete(companies::handle_delete),
        )
        // Applicants
        .route(
            "/applicants",
            post(applicants::handle_create).get(applicants::handle_list),
        )
        .route(
            "/applicants/:id",
            get(applicants::handle_get)
                .patch(applicants::handle_update)
                .delete(applicants::handle_delete),
        )
        // Postings
        .route(
            "/postings",
            post(postings::handle_create).get(postings::handle_list),
        )
        .route(
            "/postings/company/:id",
            get(postings::handle_list_by_company),
        )
        .route(
            "/postings/:id",
            get(postings::handle_get)
                .patch(postings::handle_update)
                .delete(postings::handle_close),
        )
        // Applications
        .route("/applications", post(applications::handle_submit))
        .route(
            "/applications/posting/:id",
            get(applications::handle_list_by_posting),
        )
        .route(
            "/applications/applicant/:id",
            get(applications::handle_list_by_applicant),
        )
        .route(
            "/applications/company/:id",
            get(applications::handle_list_by_company),
        )
        .route(
            "/applications/:id",
            get(applications::handle_get).patch(applications::handle_update),
        )
        .route(
            "/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Storage
        .route("/storage/upload-cv", post(storage::handle_upload_cv))
        .with_state(state)
}
