//! Authentication extractors.
//!
//! Sign-in state lives in the session: a [`CurrentUser`] plus the backend
//! access token. All routes are JSON, so a missing sign-in is a 401 rather
//! than a redirect.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::SecretString;
use tastebud_core::UserRole;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.email)
/// }
/// ```
pub struct RequireAuth {
    pub user: CurrentUser,
    /// Backend bearer token for calls made on the user's behalf.
    pub token: SecretString,
}

impl RequireAuth {
    /// Reject users whose role fails `allowed`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` naming `what` when the role is not allowed.
    pub fn require_role(&self, allowed: fn(UserRole) -> bool, what: &str) -> Result<(), AppError> {
        if allowed(self.user.role) {
            Ok(())
        } else {
            tracing::debug!(role = %self.user.role, what, "Role not permitted");
            Err(AppError::Forbidden(format!(
                "{what} is not available to {} accounts",
                self.user.role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = || AppError::Unauthorized("Sign in required".to_string());

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or_else(unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await?
            .ok_or_else(unauthorized)?;
        let token: String = session
            .get(session_keys::ACCESS_TOKEN)
            .await?
            .ok_or_else(unauthorized)?;

        Ok(Self {
            user,
            token: SecretString::from(token),
        })
    }
}

/// Extractor that optionally gets the current user.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the signed-in user and token in the session.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    session.insert(session_keys::ACCESS_TOKEN, token).await
}

/// Clear sign-in state from the session (logout). The cart is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.remove_value(session_keys::ACCESS_TOKEN).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use tastebud_core::{Email, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: UserId::new(5),
            role,
            email: Email::parse("diner@example.com").unwrap(),
        }
    }

    fn parts_with(session: Option<Session>) -> Parts {
        let (mut parts, ()) = Request::builder().uri("/api/orders").body(()).unwrap().into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        parts
    }

    #[tokio::test]
    async fn test_require_auth_rejects_anonymous() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut parts = parts_with(Some(session));
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_require_auth_after_login_and_logout() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_current_user(&session, &user(UserRole::Customer), "token-1")
            .await
            .unwrap();

        let mut parts = parts_with(Some(session.clone()));
        let auth = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.user.id, UserId::new(5));

        clear_current_user(&session).await.unwrap();
        let mut parts = parts_with(Some(session));
        assert!(RequireAuth::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_optional_auth_without_session_layer() {
        let mut parts = parts_with(None);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_require_role() {
        let auth = RequireAuth {
            user: user(UserRole::Customer),
            token: SecretString::from("t"),
        };
        assert!(matches!(
            auth.require_role(UserRole::can_view_revenue, "Revenue dashboard"),
            Err(AppError::Forbidden(_))
        ));

        let auth = RequireAuth {
            user: user(UserRole::Investor),
            token: SecretString::from("t"),
        };
        assert!(auth.require_role(UserRole::can_view_revenue, "Revenue dashboard").is_ok());
    }
}
