#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row including the password hash. Never serialized into a response —
/// handlers return [`ApplicantPublic`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub cv_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub skills: Option<Value>,
    pub years_experience: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Redacted projection returned by every applicant endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantPublic {
    pub id: Uuid,
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cv_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub skills: Option<Value>,
    pub years_experience: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Column list matching [`ApplicantPublic`], for explicit SELECT projections.
pub const APPLICANT_PUBLIC_COLUMNS: &str = "id, tax_id, name, email, phone, cv_url, \
     linkedin_url, skills, years_experience, status, created_at";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_has_no_hash_field() {
        let applicant = ApplicantPublic {
            id: Uuid::new_v4(),
            tax_id: "12.345.678-9".into(),
            name: "Jo Rivera".into(),
            email: "jo@example.com".into(),
            phone: None,
            cv_url: None,
            linkedin_url: None,
            skills: None,
            years_experience: Some(4),
            status: crate::models::company::STATUS_ACTIVE.into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&applicant).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert!(!APPLICANT_PUBLIC_COLUMNS.contains("password_hash"));
    }
}
