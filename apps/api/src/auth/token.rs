use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tokens are valid for a fixed window after login.
const TOKEN_TTL_HOURS: i64 = 24;

/// The two principal namespaces. Companies and applicants have separate
/// identity tables; the role in the token says which one `sub` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Company,
    Applicant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies the signed bearer tokens carried on `(auth)` routes.
/// Stateless — the only shared state is the signing secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, subject: Uuid, email: &str, role: Role) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to encode token: {e}"))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| anyhow!("Token validation failed: {e}"))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("a-test-secret-that-is-long-enough")
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let svc = service();
        let id = Uuid::new_v4();

        let token = svc.issue(id, "jo@example.com", Role::Applicant).expect("issue");
        let claims = svc.verify(&token).expect("verify");

        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "jo@example.com");
        assert_eq!(claims.role, Role::Applicant);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_company_role_survives_round_trip() {
        let svc = service();
        let token = svc
            .issue(Uuid::new_v4(), "hr@acme.example", Role::Company)
            .expect("issue");
        assert_eq!(svc.verify(&token).expect("verify").role, Role::Company);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service().verify("not.a.token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .issue(Uuid::new_v4(), "jo@example.com", Role::Applicant)
            .expect("issue");
        let other = TokenService::new("a-different-secret-entirely-here");
        assert!(other.verify(&token).is_err());
    }
}
