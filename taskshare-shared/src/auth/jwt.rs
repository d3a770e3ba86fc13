/// Token issuance and validation
///
/// Identity tokens are HS256-signed JWTs carrying the user id, role, token
/// kind, and an absolute expiry. Two kinds exist:
///
/// - **Access**: short-lived (default 30 minutes), proves identity for a
///   single request
/// - **Refresh**: long-lived (default 7 days), exchanged for a fresh
///   access/refresh pair
///
/// The service is constructed from an explicit secret and TTL pair rather
/// than reading configuration ambiently, so tests can run with distinct
/// secrets and clocks. Tokens are self-contained; there is no revocation
/// list, and a token stays valid for its whole lifetime once issued.
///
/// Validation collapses every failure (bad signature, structural corruption,
/// expiry) into the single opaque [`TokenError::Invalid`]. Kind
/// discrimination is the caller's responsibility: the session middleware
/// rejects refresh tokens presented as bearer credentials, and the refresh
/// endpoint rejects access tokens.
///
/// # Example
///
/// ```
/// use taskshare_shared::auth::jwt::{TokenService, TokenType};
/// use taskshare_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::with_defaults("a-secret-of-at-least-32-bytes!!!");
///
/// let token = tokens.issue_access(Uuid::new_v4(), Role::User)?;
/// let claims = tokens.validate(&token)?;
/// assert_eq!(claims.token_type, TokenType::Access);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 30;

/// Default refresh token lifetime in days
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to encode a token
    #[error("Failed to create token: {0}")]
    Encode(String),

    /// Token failed validation
    ///
    /// Covers signature mismatch, structural corruption, and expiry without
    /// distinguishing them.
    #[error("Invalid or expired token")]
    Invalid,
}

/// Token kind identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token used as the bearer credential on requests
    Access,

    /// Long-lived token exchanged for a new access/refresh pair
    Refresh,
}

/// JWT claims structure
///
/// - `sub`: subject (user id)
/// - `role`: role carried at issuance; role changes after issuance do not
///   propagate into already-issued tokens
/// - `type`: access or refresh
/// - `iat` / `exp`: issued-at and absolute expiry (Unix timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Role at issuance time
    pub role: Role,

    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues and validates signed identity tokens
///
/// Stateless: holds only the signing keys and the configured TTLs. Safe to
/// call concurrently from any number of requests.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Creates a token service with explicit TTLs
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Creates a token service with the default TTLs (30 min / 7 days)
    pub fn with_defaults(secret: &str) -> Self {
        Self::new(
            secret,
            Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            Duration::days(DEFAULT_REFRESH_TTL_DAYS),
        )
    }

    /// Issues an access token for a user
    pub fn issue_access(&self, user_id: Uuid, role: Role) -> Result<String, TokenError> {
        self.issue(user_id, role, TokenType::Access, self.access_ttl)
    }

    /// Issues a refresh token for a user
    pub fn issue_refresh(&self, user_id: Uuid, role: Role) -> Result<String, TokenError> {
        self.issue(user_id, role, TokenType::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: Uuid,
        role: Role,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token, returning its claims
    ///
    /// Verifies the signature and expiry. Any failure yields the opaque
    /// [`TokenError::Invalid`]; callers must check `token_type` themselves
    /// when they only accept one kind.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_and_validate_access_token() {
        let tokens = TokenService::with_defaults(SECRET);
        let user_id = Uuid::new_v4();

        let token = tokens.issue_access(user_id, Role::User).unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_refresh_token_kind() {
        let tokens = TokenService::with_defaults(SECRET);

        let token = tokens.issue_refresh(Uuid::new_v4(), Role::Admin).unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let tokens = TokenService::with_defaults(SECRET);
        let other = TokenService::with_defaults("a-completely-different-secret-key!!");

        let token = tokens.issue_access(Uuid::new_v4(), Role::User).unwrap();
        assert!(matches!(other.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let tokens = TokenService::with_defaults(SECRET);

        assert!(matches!(tokens.validate(""), Err(TokenError::Invalid)));
        assert!(matches!(
            tokens.validate("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_validate_expired_token() {
        // Issue with a TTL in the past
        let tokens = TokenService::new(SECRET, Duration::seconds(-3600), Duration::seconds(-3600));

        let token = tokens.issue_access(Uuid::new_v4(), Role::User).unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_refresh_token_validates_at_service_level() {
        // The service itself does not reject kinds; that is the caller's job
        let tokens = TokenService::with_defaults(SECRET);

        let refresh = tokens.issue_refresh(Uuid::new_v4(), Role::User).unwrap();
        let claims = tokens.validate(&refresh).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_claims_wire_field_names() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            token_type: TokenType::Access,
            iat: 0,
            exp: i64::MAX,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "access");
        assert_eq!(json["role"], "user");
        assert!(json["sub"].is_string());
    }
}
