//! Session-cookie authentication and the staff gate for the dashboard.
//!
//! Sessions live in the moka cache on [`AppState`]; the cookie only
//! carries an opaque token. Anything that fails the gate is redirected to
//! the login page rather than answered with an error status.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, warn};

use crate::schemas::AppState;

pub const SESSION_COOKIE: &str = "podash_session";

/// The authenticated user attached to request extensions by
/// [`require_staff`].
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
}

/// Hash a password into PHC string format.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC hash. An unparseable hash
/// counts as a failed verification.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Extract the session token from the Cookie header, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Middleware guarding the dashboard routes.
///
/// A request without a live session, or with a session belonging to a
/// non-staff user, is answered with a redirect to the login page — never
/// with a 5xx. On success the [`SessionUser`] is injected into request
/// extensions.
pub async fn require_staff(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = match session_token(req.headers()) {
        Some(token) => state.sessions.get(&token).await,
        None => None,
    };

    match user {
        Some(user) if user.is_staff => {
            debug!(username = %user.username, "staff user admitted to dashboard");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Some(user) => {
            warn!(username = %user.username, "non-staff user denied dashboard access");
            Redirect::to("/login").into_response()
        }
        None => Redirect::to("/login").into_response(),
    }
}
