use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use backoffice_common::{Envelope, schema};
use sea_orm::*;
use serde_json::Value;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{SESSION_COOKIE, request_token};
use crate::extractors::json::AppJson;
use crate::extractors::locale::RequestLocale;
use crate::models::auth::{LoginRequest, LoginResponse, MeResponse};
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Cookie holding the `state` value sent to an OAuth provider.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

fn cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Sign in with email and password",
    description = "Verifies the credentials and returns a JWT. The token is also set as the `session` cookie. Suspended and withdrawn accounts cannot sign in.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 403, description = "Account may not sign in (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn login(
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<Value>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let messages = state.messages(locale);
    let errors = schema::login().validate(&body, messages);
    if !errors.is_empty() {
        return Err(AppError::Validation {
            message: messages.text("error.validation", &[]),
            errors,
        });
    }
    let payload: LoginRequest = serde_json::from_value(body)
        .map_err(|e| AppError::validation(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .filter(user::Column::IsUse.eq(true))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &found.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }
    if !found.status.can_sign_in() {
        return Err(AppError::PermissionDenied);
    }

    let auth = &state.config.auth;
    let token = jwt::sign(&found.uid, found.role, auth.token_ttl_hours, &auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    let mut active = found.into_active_model();
    active.last_login_at = Set(Some(chrono::Utc::now()));
    let signed_in = active.update(&state.db).await?;

    tracing::info!(user = %signed_in.uid, "signed in");

    let jar = jar.add(cookie(SESSION_COOKIE, token.clone(), auth.cookie_secure));
    Ok((
        jar,
        Json(LoginResponse {
            token,
            user: signed_in.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Sign out",
    description = "Clears the `session` cookie. Bearer tokens stay valid until they expire.",
    responses((status = 200, description = "Signed out")),
)]
pub async fn logout(
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Envelope<()>>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let message = state.messages(locale).text("action.logged_out", &[]);
    (jar, Json(Envelope::message(message)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    description = "Resolves the bearer token or `session` cookie to the signed-in account.",
    responses(
        (status = 200, description = "Signed in (OK)", body = MeResponse),
        (status = 401, description = "NO_TOKEN, INVALID_TOKEN or USER_NOT_FOUND", body = MeResponse),
        (status = 500, description = "SERVER_ERROR", body = MeResponse),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip_all)]
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> (StatusCode, Json<MeResponse>) {
    let token = match request_token(&headers) {
        Ok(token) => token,
        Err(AppError::TokenInvalid) => {
            return (StatusCode::UNAUTHORIZED, Json(MeResponse::failed("INVALID_TOKEN")));
        }
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(MeResponse::failed("NO_TOKEN"))),
    };

    let Ok(claims) = jwt::verify(&token, &state.config.auth.jwt_secret) else {
        return (StatusCode::UNAUTHORIZED, Json(MeResponse::failed("INVALID_TOKEN")));
    };

    let found = user::Entity::find()
        .filter(user::Column::Uid.eq(claims.sub.as_str()))
        .filter(user::Column::IsUse.eq(true))
        .one(&state.db)
        .await;

    match found {
        Ok(Some(model)) => (StatusCode::OK, Json(MeResponse::ok(model.into()))),
        Ok(None) => (StatusCode::UNAUTHORIZED, Json(MeResponse::failed("USER_NOT_FOUND"))),
        Err(e) => {
            tracing::error!(error = %e, "failed to load current user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MeResponse::failed("SERVER_ERROR")),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/{provider}",
    tag = "Auth",
    operation_id = "oauthRedirect",
    summary = "Start an OAuth sign-in",
    description = "Redirects to the provider's authorize URL with a random `state`, which is also stored in the `oauth_state` cookie.",
    params(("provider" = String, Path, description = "Configured provider name")),
    responses(
        (status = 302, description = "Redirect to the provider"),
        (status = 404, description = "Unknown provider (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(provider = %provider))]
pub async fn oauth_redirect(
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    jar: CookieJar,
    Path(provider): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(config) = state.config.oauth.providers.get(&provider) else {
        let messages = state.messages(locale);
        let label = messages.resource_label("oauth_provider");
        return Err(AppError::NotFound(messages.text(
            "error.not_found",
            &[("resource", &label), ("id", &provider)],
        )));
    };

    let mut target = url::Url::parse(&config.authorize_url)
        .map_err(|e| AppError::Internal(format!("invalid authorize_url for {provider}: {e}")))?;
    let csrf = uuid::Uuid::new_v4().simple().to_string();
    target
        .query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &config.scope)
        .append_pair("state", &csrf);

    let jar = jar.add(cookie(
        OAUTH_STATE_COOKIE,
        csrf,
        state.config.auth.cookie_secure,
    ));
    Ok((
        StatusCode::FOUND,
        jar,
        [(header::LOCATION, target.to_string())],
    ))
}
