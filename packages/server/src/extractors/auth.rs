use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::CookieJar;
use backoffice_common::UserRole;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Cookie carrying the JWT issued at login.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated user, taken from `Authorization: Bearer <token>` or,
/// failing that, the `session` cookie.
///
/// Add this as a handler parameter to require authentication.
/// Role checks happen via `require_staff()` / `require_admin()` in the handler body.
/// The role is the account's current one, not the one the token was issued with.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub role: UserRole,
}

impl AuthUser {
    /// Admins and managers may use the backoffice.
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Destructive operations are reserved for admins.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

/// Raw token from the request. A malformed `Authorization` header is
/// `TokenInvalid` rather than a reason to look at the cookie.
pub fn request_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::TokenInvalid)?;
        return Ok(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::TokenMissing)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers)?;

        let claims = jwt::verify(&token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        // Deleted accounts lose their tokens; suspended ones keep them but
        // may not act.
        let account = user::Entity::find()
            .filter(user::Column::Uid.eq(claims.sub.as_str()))
            .filter(user::Column::IsUse.eq(true))
            .one(&state.db)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        if !account.status.can_sign_in() {
            return Err(AppError::PermissionDenied);
        }

        Ok(AuthUser {
            uid: account.uid,
            role: account.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=xyz"));
        assert_eq!(request_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn session_cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("locale=en; session=xyz"));
        assert_eq!(request_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn missing_and_malformed_tokens_differ() {
        assert!(matches!(
            request_token(&HeaderMap::new()),
            Err(AppError::TokenMissing)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            request_token(&headers),
            Err(AppError::TokenInvalid)
        ));
    }

    #[test]
    fn role_checks() {
        let manager = AuthUser {
            uid: "u1".into(),
            role: UserRole::Manager,
        };
        assert!(manager.require_staff().is_ok());
        assert!(matches!(
            manager.require_admin(),
            Err(AppError::PermissionDenied)
        ));

        let member = AuthUser {
            uid: "u2".into(),
            role: UserRole::Member,
        };
        assert!(member.require_staff().is_err());
    }
}
