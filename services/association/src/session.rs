//! Session extractor and role guards.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use assoc_session::cookie::ASSOC_SESSION;
use assoc_session::token::{SessionInfo, validate_session_token};

use crate::error::AssociationError;
use crate::state::AppState;

/// Authenticated session extracted from the signed session cookie.
///
/// Extraction fails with 401 when the cookie is absent, expired, or
/// tampered with. Role enforcement (403) is done via [`Session::require_admin`].
#[derive(Debug, Clone)]
pub struct Session(pub SessionInfo);

impl Session {
    /// Guard for admin-only handlers.
    pub fn require_admin(&self) -> Result<(), AssociationError> {
        if self.0.role.is_admin() {
            Ok(())
        } else {
            Err(AssociationError::AdminRequired)
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AssociationError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(ASSOC_SESSION).map(|c| c.value().to_owned());
        let secret = AppState::from_ref(state).session_secret;

        async move {
            let token = token.ok_or(AssociationError::LoginRequired)?;
            let info = validate_session_token(&token, &secret)
                .map_err(|_| AssociationError::LoginRequired)?;
            Ok(Self(info))
        }
    }
}
