//! Session cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name carrying the signed session token.
pub const ASSOC_SESSION: &str = "assoc_session";

/// Session lifetime in seconds (1 day).
pub const SESSION_EXP: u64 = 86400;

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use assoc_session::cookie::{set_session_cookie, ASSOC_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string());
/// let cookie = jar.get(ASSOC_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86400)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String) -> CookieJar {
    let cookie = Cookie::build((ASSOC_SESSION, value))
        .path("/")
        .max_age(Duration::seconds(SESSION_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use assoc_session::cookie::{clear_session_cookie, set_session_cookie, ASSOC_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string());
/// let jar = clear_session_cookie(jar);
/// let cookie = jar.get(ASSOC_SESSION).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    let cookie = Cookie::build((ASSOC_SESSION, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
