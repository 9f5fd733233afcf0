//! Signed session token issuance and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use assoc_domain::user::UserRole;

use crate::cookie::SESSION_EXP;

/// Identity carried by a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub session_exp: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload for the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Username at login time.
    pub name: String,
    /// Role string (`"admin"` / `"student"`).
    pub role: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Issue a signed session token for a logged-in user.
pub fn issue_session_token(
    user_id: Uuid,
    username: &str,
    role: UserRole,
    secret: &str,
) -> Result<String, SessionError> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        name: username.to_owned(),
        role: role.as_str().to_owned(),
        exp: now_secs() + SESSION_EXP,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| SessionError::Malformed)
}

/// Validate a session-cookie value, returning the parsed identity.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway of 60s tolerates clock skew.
pub fn validate_session_token(cookie_value: &str, secret: &str) -> Result<SessionInfo, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        cookie_value,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    let claims = data.claims;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    let role = UserRole::from_str_opt(&claims.role).ok_or(SessionError::Malformed)?;

    Ok(SessionInfo {
        user_id,
        username: claims.name,
        role,
        session_exp: claims.exp,
    })
}
