use std::sync::Arc;

use backoffice_common::{Locale, MessageBundle, Translator};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn messages(&self, locale: Locale) -> MessageBundle<'_> {
        self.translator.bundle(locale)
    }
}
