use serde::{Deserialize, Serialize};

use crate::resource::user::UserDto;

/// Request body for staff login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Account email.
    #[schema(example = "admin@example.com")]
    pub email: String,
    /// Account password.
    #[schema(example = "abc123!@")]
    pub password: String,
}

/// Successful login response. The token is also set as the `session` cookie.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserDto,
}

/// Body of `GET /auth/me`, both on success and failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub success: bool,
    /// `OK`, `NO_TOKEN`, `INVALID_TOKEN`, `USER_NOT_FOUND` or `SERVER_ERROR`.
    #[schema(example = "OK")]
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}

impl MeResponse {
    pub fn ok(user: UserDto) -> Self {
        Self {
            success: true,
            code: "OK",
            user: Some(user),
        }
    }

    pub fn failed(code: &'static str) -> Self {
        Self {
            success: false,
            code,
            user: None,
        }
    }
}

/// Service liveness report.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// `ok` when a trivial query succeeds, `error` otherwise.
    #[schema(example = "ok")]
    pub database: &'static str,
}
