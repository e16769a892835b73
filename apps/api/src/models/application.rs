#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// The allowed application states. There is deliberately no transition
/// guard: any state may overwrite any other, matching the observed behavior
/// of the evaluation callback and manual review flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    InReview,
    Evaluated,
    Rejected,
    Selected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::InReview => "in_review",
            ApplicationStatus::Evaluated => "evaluated",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Selected => "selected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "in_review" => Some(ApplicationStatus::InReview),
            "evaluated" => Some(ApplicationStatus::Evaluated),
            "rejected" => Some(ApplicationStatus::Rejected),
            "selected" => Some(ApplicationStatus::Selected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
    pub answers: Option<Value>,
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

/// Application joined with applicant summary columns — the shape a company
/// reviews candidates through.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithApplicant {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
    pub answers: Option<Value>,
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub applicant_tax_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub applicant_cv_url: Option<String>,
    pub applicant_linkedin_url: Option<String>,
    pub applicant_skills: Option<Value>,
    pub applicant_years_experience: Option<i32>,
}

/// Application joined with posting and company summaries — the shape an
/// applicant reviews their own submissions through.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithPosting {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
    pub answers: Option<Value>,
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub posting_title: String,
    pub posting_status: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub company_logo_url: Option<String>,
}

/// The company-wide review shape: applicant contact summary plus which
/// posting the application targets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationForCompany {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
    pub answers: Option<Value>,
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub applicant_tax_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub applicant_linkedin_url: Option<String>,
    pub applicant_years_experience: Option<i32>,
    pub posting_title: String,
}

/// Single-application detail: applicant summary plus posting and company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationDetail {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
    pub answers: Option<Value>,
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub applicant_tax_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub applicant_cv_url: Option<String>,
    pub applicant_linkedin_url: Option<String>,
    pub applicant_skills: Option<Value>,
    pub applicant_years_experience: Option<i32>,
    pub posting_title: String,
    pub posting_status: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub company_logo_url: Option<String>,
}

/// Everything the fallback evaluator needs: résumé, answers, and the
/// posting's requirements and the applicant's declared skills.
#[derive(Debug, Clone, FromRow)]
pub struct EvaluationContext {
    pub posting_id: Uuid,
    pub answers: Option<Value>,
    pub cv_url: Option<String>,
    pub skills: Option<Value>,
    pub requirements: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "in_review", "evaluated", "rejected", "selected"] {
            assert_eq!(ApplicationStatus::parse(s).map(|v| v.as_str()), Some(s));
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert_eq!(ApplicationStatus::parse("PENDING"), None);
        assert_eq!(ApplicationStatus::parse("archived"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }
}
