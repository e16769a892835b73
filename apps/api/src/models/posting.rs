#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    FullTime,
    PartTime,
    Contractor,
    Internship,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::FullTime => "full_time",
            ContractType::PartTime => "part_time",
            ContractType::Contractor => "contractor",
            ContractType::Internship => "internship",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full_time" => Some(ContractType::FullTime),
            "part_time" => Some(ContractType::PartTime),
            "contractor" => Some(ContractType::Contractor),
            "internship" => Some(ContractType::Internship),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    OnSite,
    Remote,
    Hybrid,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::OnSite => "on_site",
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on_site" => Some(WorkMode::OnSite),
            "remote" => Some(WorkMode::Remote),
            "hybrid" => Some(WorkMode::Hybrid),
            _ => None,
        }
    }
}

/// Posting lifecycle is one-way: open postings can be closed, never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStatus {
    Open,
    Closed,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Open => "open",
            PostingStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(PostingStatus::Open),
            "closed" => Some(PostingStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostingRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub contract_type: String,
    pub location: String,
    pub work_mode: String,
    pub estimated_salary: Option<i64>,
    pub screening_questions: Option<Value>,
    pub requirements: Option<String>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: String,
    pub published_at: DateTime<Utc>,
}

/// Posting joined with its owning company's summary columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostingWithCompany {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub contract_type: String,
    pub location: String,
    pub work_mode: String,
    pub estimated_salary: Option<i64>,
    pub screening_questions: Option<Value>,
    pub requirements: Option<String>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: String,
    pub published_at: DateTime<Utc>,
    pub company_tax_id: String,
    pub company_name: String,
    pub company_logo_url: Option<String>,
}

/// Posting with the number of applications it has received.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostingWithCount {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub contract_type: String,
    pub location: String,
    pub work_mode: String,
    pub estimated_salary: Option<i64>,
    pub screening_questions: Option<Value>,
    pub requirements: Option<String>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: String,
    pub published_at: DateTime<Utc>,
    pub application_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_type_round_trip() {
        for s in ["full_time", "part_time", "contractor", "internship"] {
            assert_eq!(ContractType::parse(s).map(|c| c.as_str()), Some(s));
        }
        assert_eq!(ContractType::parse("freelance"), None);
    }

    #[test]
    fn test_work_mode_round_trip() {
        for s in ["on_site", "remote", "hybrid"] {
            assert_eq!(WorkMode::parse(s).map(|m| m.as_str()), Some(s));
        }
        assert_eq!(WorkMode::parse("office"), None);
    }

    #[test]
    fn test_posting_status_rejects_unknown() {
        assert_eq!(PostingStatus::parse("open"), Some(PostingStatus::Open));
        assert_eq!(PostingStatus::parse("closed"), Some(PostingStatus::Closed));
        assert_eq!(PostingStatus::parse("reopened"), None);
    }
}
