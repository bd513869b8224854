/// Session token generation and validation
///
/// Tokens are signed with HS256 and carry the user id and email so
/// downstream handlers can scope every operation to the owner without
/// another lookup. A token expires seven days after issuance.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256)
/// - **Expiration**: 7 days, enforced at validation
/// - **Validation**: signature, expiry, and issuer checks
/// - **Secret**: server-held, at least 32 bytes
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = create_token(&Claims::new(42, "a@example.com"), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token issuer
const ISSUER: &str = "taskflow";

/// Session token lifetime
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("token has expired")]
    Expired,

    /// Signature, issuer, or format check failed
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Claims embedded in a session token
///
/// `sub` is the user id; `email` rides along so responses can echo the
/// identity without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Email address at issuance time
    pub email: String,

    /// Issuer, always "taskflow"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring [`TOKEN_TTL_DAYS`] from now
    pub fn new(user_id: i64, email: &str) -> Self {
        Self::with_ttl(user_id, email, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Creates claims with a custom lifetime (negative durations make
    /// already-expired tokens, which the tests lean on)
    pub fn with_ttl(user_id: i64, email: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs a session token from claims
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, the expiry, and that the issuer is
/// "taskflow".
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(7, "user@example.com");
        let token = create_token(&claims, SECRET).expect("should create token");

        let validated = validate_token(&token, SECRET).expect("should validate token");
        assert_eq!(validated.sub, 7);
        assert_eq!(validated.email, "user@example.com");
        assert_eq!(validated.iss, "taskflow");
    }

    #[test]
    fn test_seven_day_expiry() {
        let claims = Claims::new(1, "a@b.c");
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, TOKEN_TTL_DAYS * 24 * 60 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&Claims::new(1, "a@b.c"), SECRET).unwrap();
        let result = validate_token(&token, "another-secret-also-32-bytes-long!!");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_ttl(1, "a@b.c", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage() {
        assert!(matches!(
            validate_token("not-a-token", SECRET),
            Err(JwtError::Invalid(_))
        ));
    }
}
