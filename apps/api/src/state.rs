use std::time::Instant;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::Config;
use crate::evaluator::EvaluatorClient;

/// Shared application state injected into all route handlers via Axum
/// extractors. Initialized once at startup; the pool and clients are the
/// only resources shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub evaluator: EvaluatorClient,
    pub tokens: TokenService,
    pub config: Config,
    /// Process start, reported as uptime by /health.
    pub started_at: Instant,
}
