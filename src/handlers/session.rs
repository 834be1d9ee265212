use axum::Form;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use model::entities::user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::{SESSION_COOKIE, SessionUser, session_token, verify_password};
use crate::pages;
use crate::schemas::{AppState, LoginForm};

/// Render the login form
#[instrument]
pub async fn login_page() -> Html<String> {
    Html(pages::render_login(None))
}

/// Verify credentials, open a session and redirect to the dashboard.
///
/// Bad credentials re-render the form with a message instead of exposing
/// whether the username or the password was wrong.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let found = match user::Entity::find()
        .filter(user::Column::Username.eq(form.username.as_str()))
        .one(&state.db)
        .await
    {
        Ok(found) => found,
        Err(e) => {
            error!("Failed to look up user: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::render_login(Some("Something went wrong, try again"))),
            )
                .into_response();
        }
    };

    let valid = found
        .as_ref()
        .map(|u| verify_password(&form.password, &u.password_hash))
        .unwrap_or(false);

    let Some(account) = found.filter(|_| valid) else {
        warn!(username = %form.username, "failed login attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Html(pages::render_login(Some("Invalid username or password"))),
        )
            .into_response();
    };

    let token = Uuid::new_v4().to_string();
    state
        .sessions
        .insert(
            token.clone(),
            SessionUser {
                user_id: account.id,
                username: account.username.clone(),
                is_staff: account.is_staff,
            },
        )
        .await;

    info!(username = %account.username, "user logged in");
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to("/admin/dashboard"),
    )
        .into_response()
}

/// Drop the session and clear the cookie.
#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.invalidate(&token).await;
    }

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}
