#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account status shared by companies and applicants. Deletion is a status
/// flip — rows are never physically removed.
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

/// Full row including the password hash. Never serialized into a response —
/// handlers return [`CompanyPublic`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyRow {
    pub id: Uuid,
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Redacted projection returned by every company endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyPublic {
    pub id: Uuid,
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Column list matching [`CompanyPublic`], for explicit SELECT projections.
pub const COMPANY_PUBLIC_COLUMNS: &str =
    "id, tax_id, name, email, description, logo_url, status, created_at";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_has_no_hash_field() {
        let company = CompanyPublic {
            id: Uuid::new_v4(),
            tax_id: "76.543.210-K".into(),
            name: "Acme".into(),
            email: "hr@acme.example".into(),
            description: None,
            logo_url: None,
            status: STATUS_ACTIVE.into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&company).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert!(!COMPANY_PUBLIC_COLUMNS.contains("password_hash"));
    }
}
