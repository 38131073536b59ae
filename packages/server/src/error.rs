use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use backoffice_common::{EnvelopeStatus, FieldError};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `error`.
    pub status: EnvelopeStatus,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `MISSING_FIELDS`,
    /// `TOKEN_MISSING`, `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`,
    /// `NOT_FOUND`, `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description, in the request locale where one applies.
    #[schema(example = "Please check the submitted values.")]
    pub message: String,
    /// Per-field violations, present only for `VALIDATION_ERROR`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    MissingFields(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    /// A validation failure without field details, e.g. a malformed query value.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::MissingFields(_) => "MISSING_FIELDS",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::PermissionDenied => "PERMISSION_DENIED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let code = self.code();
        let (status, message, errors) = match self {
            AppError::Validation { message, errors } => (StatusCode::BAD_REQUEST, message, errors),
            AppError::MissingFields(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".into(),
                Vec::new(),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".into(),
                Vec::new(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".into(),
                Vec::new(),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                "Insufficient permissions".into(),
                Vec::new(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                    Vec::new(),
                )
            }
        };

        (
            status,
            ErrorBody {
                status: EnvelopeStatus::Error,
                code,
                message,
                errors,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

/// Store errors reaching this conversion carry no localized context.
/// Actions translate `NotFound` and `Conflict` themselves before falling back here.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Not found".into()),
            StoreError::Conflict(detail) => AppError::Conflict(detail),
            StoreError::Prepare(detail) => AppError::Internal(detail),
            StoreError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_carry_field_details() {
        let err = AppError::Validation {
            message: "bad".into(),
            errors: vec![FieldError {
                field: "email".into(),
                code: "validation.required".into(),
                message: "Email is required.".into(),
            }],
        };
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"][0]["field"], "email");
    }

    #[test]
    fn other_errors_omit_the_errors_list() {
        let (status, body) = AppError::MissingFields("ids".into()).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "MISSING_FIELDS");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let (status, body) = AppError::Internal("db exploded".into()).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "An unexpected error occurred");
    }
}
