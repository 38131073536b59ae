use backoffice_common::schema::FormMode;
use backoffice_common::validation::CharClass;
use backoffice_common::{Rule, Schema, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, NewRow, Resource, clean, entity_columns};
use crate::entity::config;
use crate::store::StoreError;

/// Site-wide key/value configuration entries.
pub struct Configs;

#[derive(Debug, Deserialize)]
pub struct ConfigForm {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigDto {
    pub idx: i32,
    pub uid: String,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Configs {
    entity_columns!(config);

    type Form = ConfigForm;
    type Dto = ConfigDto;

    const NAME: &'static str = "config";

    fn search_columns() -> Vec<Self::Column> {
        vec![config::Column::Key, config::Column::Description]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field(
                "key",
                [
                    Rule::required(),
                    Rule::max_length(100),
                    Rule::only(&[CharClass::Lowercase, CharClass::Digit], "._-"),
                ],
            )
            .field("value", [Rule::max_length(10_000)])
            .field("description", [Rule::max_length(500)])
    }

    fn create(form: ConfigForm, row: NewRow) -> Result<config::ActiveModel, StoreError> {
        Ok(config::ActiveModel {
            uid: Set(row.uid),
            key: Set(form.key.trim().to_string()),
            value: Set(form.value),
            description: Set(clean(form.description)),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut config::ActiveModel,
        form: ConfigForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.key = Set(form.key.trim().to_string());
        active.value = Set(form.value);
        active.description = Set(clean(form.description));
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: config::Model, _files: Vec<FileDto>) -> ConfigDto {
        ConfigDto {
            idx: m.idx,
            uid: m.uid,
            key: m.key,
            value: m.value,
            description: m.description,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}
