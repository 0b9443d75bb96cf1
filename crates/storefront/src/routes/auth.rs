//! Authentication route handlers.
//!
//! Accounts live in the backend. The storefront forwards sign-up and login,
//! then keeps the returned identity and token in the session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tastebud_core::{Email, Registration, UserId, UserRole};
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{LoginRequest, RegisterResponse};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Sign-up form.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Login form.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// The signed-in identity returned to the browser.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl From<CurrentUser> for MeResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Create an account in the backend.
#[instrument(skip(state, form), fields(email = %form.email, role = %form.role))]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let registration = Registration::new(
        &form.username,
        &form.email,
        form.password,
        &form.phone,
        form.role,
    )?;

    let response = state.backend().register(&registration).await?;
    tracing::info!(user_id = ?response.user_id, "Account created");

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in via the backend and remember the identity in the session.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<MeResponse>> {
    let email =
        Email::parse(&form.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    if form.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let token = state
        .backend()
        .login(&LoginRequest {
            email: email.as_str().to_string(),
            password: form.password,
        })
        .await?;

    let user = CurrentUser {
        id: UserId::new(token.user_id),
        role: token.role,
        email,
    };
    set_current_user(&session, &user, &token.access_token).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(Json(user.into()))
}

/// Forget the signed-in identity. The cart survives logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in identity, or 401.
pub async fn me(OptionalAuth(user): OptionalAuth) -> Result<Json<MeResponse>> {
    user.map(|u| Json(u.into()))
        .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))
}
