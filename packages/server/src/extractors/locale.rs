use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::extract::CookieJar;
use backoffice_common::Locale;

use crate::state::AppState;

/// Language of the current request, read from the `locale` cookie.
/// Missing or unsupported values fall back to the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(header_locale(
            &parts.headers,
            state.config.i18n.default_locale,
        )))
    }
}

pub fn header_locale(headers: &HeaderMap, fallback: Locale) -> Locale {
    let jar = CookieJar::from_headers(headers);
    Locale::from_cookie_or(jar.get(Locale::COOKIE_NAME).map(|c| c.value()), fallback)
}
