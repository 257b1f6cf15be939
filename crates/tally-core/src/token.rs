use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which flow a token belongs to. Access tokens authorize API calls;
/// refresh tokens can only be exchanged for a new pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    Access,
    Refresh,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Access => "access",
            TokenScope::Refresh => "refresh",
        }
    }
}

/// JWT claim set. `sub` is the user's email; `scope` separates the
/// access and refresh flows so one can never stand in for the other.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub admin: bool,
    pub scope: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 signing configuration and TTLs for both token kinds.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(14),
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Issue a short-lived access token for the given user.
    pub fn issue_access(&self, email: &str, admin: bool) -> Result<String, AppError> {
        self.issue(email, admin, TokenScope::Access, self.access_ttl)
    }

    /// Issue a long-lived refresh token for the given user.
    pub fn issue_refresh(&self, email: &str, admin: bool) -> Result<String, AppError> {
        self.issue(email, admin, TokenScope::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        email: &str,
        admin: bool,
        scope: TokenScope,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            admin,
            scope: scope.as_str().to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::TokenError(e.to_string()))
    }

    /// Verify signature, expiry, and scope. A valid token of the wrong
    /// scope is rejected the same way as a forged one.
    pub fn verify(&self, token: &str, expected: TokenScope) -> Result<Claims, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AppError::TokenError(e.to_string()))?;

        if data.claims.scope != expected.as_str() {
            return Err(AppError::TokenError(format!(
                "expected {} token",
                expected.as_str()
            )));
        }
        Ok(data.claims)
    }
}
