use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use super::locale::header_locale;
use crate::error::AppError;
use crate::state::AppState;

/// JSON body whose rejections become a localized `VALIDATION_ERROR`
/// (`error.invalid_body`) instead of axum's plain-text response.
pub struct AppJson<T>(pub T);

impl<T> FromRequest<AppState> for AppJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = header_locale(req.headers(), state.config.i18n.default_locale);

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let detail = rejection.body_text();
                let message = state
                    .messages(locale)
                    .text("error.invalid_body", &[("detail", &detail)]);
                Err(AppError::validation(message))
            }
        }
    }
}
