//! JWT token handling
//!
//! Tokens are HS256-signed and carry only the subject (username) plus
//! issued-at and expiry. Nothing is stored server-side: a token is valid as
//! long as its signature checks out, it has not expired, and its subject still
//! names the caller.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::support::{DomainError, DomainResult};

/// Prefix of the `Authorization` value, trailing space included.
pub const BEARER_PREFIX: &str = "Bearer ";

const DEFAULT_EXPIRATION_HOURS: i64 = 10;
const GENERATED_SECRET_BYTES: usize = 64;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    /// A config with a freshly generated random secret.
    pub fn generated(expiration_hours: i64) -> Self {
        let mut bytes = [0u8; GENERATED_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(STANDARD.encode(bytes), expiration_hours)
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    fn new(subject: &str, now: DateTime<Utc>, ttl: Duration) -> DomainResult<Self> {
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::Internal("Token expiry out of range".into()))?;
        Ok(Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Expired once `now` reaches `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly issued token together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Issues and verifies tokens with a signing key fixed at construction.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `is_valid_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            // Out-of-range hours saturate and fail at issue time instead of panicking.
            ttl: Duration::try_hours(config.expiration_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Issue a token for `subject`, valid for the configured TTL.
    pub fn issue(&self, subject: &str) -> DomainResult<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> DomainResult<IssuedToken> {
        let claims = TokenClaims::new(subject, now, self.ttl)?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }

    /// Decode `token` and check its signature. Expiry is not checked here.
    ///
    /// Every failure collapses into `DomainError::Malformed`; the decoder's
    /// own error is only traced.
    pub fn parse(&self, token: &str) -> DomainResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(kind = ?e.kind(), "Rejected token");
                DomainError::Malformed
            })
    }

    pub fn extract_subject(&self, token: &str) -> DomainResult<String> {
        self.parse(token).map(|claims| claims.sub)
    }

    /// True iff the signature verifies, the token has not expired and its
    /// subject equals `expected_subject`.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.is_valid_at(token, expected_subject, Utc::now())
    }

    pub fn is_valid_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        match self.parse(token) {
            Ok(claims) => !claims.is_expired_at(now) && claims.sub == expected_subject,
            Err(_) => false,
        }
    }
}

/// Extract the token from an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix(BEARER_PREFIX)
}
