use std::collections::HashMap;

use backoffice_common::Locale;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sqlx_logging: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Mark the `session` cookie `Secure`. Enable behind HTTPS.
    pub cookie_secure: bool,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct I18nConfig {
    /// Locale used when the `locale` cookie is missing or unsupported.
    pub default_locale: Locale,
}

/// One OAuth authorization endpoint the backoffice can redirect to.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthProvider {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OAuthConfig {
    #[serde(default)]
    pub providers: HashMap<String, OAuthProvider>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub i18n: I18nConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.sqlx_logging", false)?
            .set_default("auth.token_ttl_hours", 168)?
            .set_default("auth.cookie_secure", false)?
            .set_default("i18n.default_locale", "ko")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., BACKOFFICE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("BACKOFFICE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
