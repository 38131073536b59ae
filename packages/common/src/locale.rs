use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the backoffice ships dictionaries for.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

/// Returned when a locale tag names a language without a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    /// Cookie carrying the user's language choice.
    pub const COOKIE_NAME: &'static str = "locale";

    pub const ALL: [Locale; 2] = [Locale::Ko, Locale::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
        }
    }

    /// Resolve the locale from a raw cookie value, falling back to `fallback`
    /// when the cookie is absent or names an unsupported language.
    pub fn from_cookie_or(value: Option<&str>, fallback: Locale) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or(fallback)
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    /// Accepts bare language tags (`ko`) and region-qualified ones (`en-US`, `ko_KR`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "ko" => Ok(Self::Ko),
            "en" => Ok(Self::En),
            _ => Err(UnsupportedLocale(tag.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
