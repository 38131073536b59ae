//! Per-entity metadata consumed by the generic store, actions and routes.
//!
//! Each backoffice screen is one zero-sized type implementing [`Resource`]:
//! which table it reads, which columns drive search and filters, how a
//! submitted form becomes a row and how a row becomes a response.

pub mod account;
pub mod attachment;
pub mod blog;
pub mod configs;
pub mod content;
pub mod fcm;
pub mod shop;
pub mod user;

use backoffice_common::Schema;
use backoffice_common::schema::FormMode;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult,
    IntoActiveModel, ModelTrait,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::StoreError;

pub use attachment::{FileDto, FileInput};

/// Values every freshly created row starts with.
#[derive(Debug, Clone)]
pub struct NewRow {
    pub uid: String,
    pub now: DateTime<Utc>,
}

impl NewRow {
    pub fn generate() -> Self {
        Self {
            uid: uuid::Uuid::now_v7().to_string(),
            now: Utc::now(),
        }
    }
}

pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + Sync;
    type Column: ColumnTrait;
    type Form: DeserializeOwned + Send + 'static;
    type Dto: Serialize + Send + Sync + 'static;

    /// Key under `resource.*` in the dictionaries; also the attachment owner type.
    const NAME: &'static str;

    /// Rows own an attachment set submitted as `files`.
    const ATTACHMENTS: bool = false;

    /// Values accepted by the status mutation. Empty when the resource has none.
    const STATUSES: &'static [&'static str] = &[];

    /// Form fields that only admins may write on create or update.
    const ADMIN_FIELDS: &'static [&'static str] = &[];

    fn idx_column() -> Self::Column;
    fn uid_column() -> Self::Column;
    fn is_use_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;

    fn visible_column() -> Option<Self::Column> {
        None
    }

    /// Columns matched by `search`, OR-ed together.
    fn search_columns() -> Vec<Self::Column> {
        Vec::new()
    }

    /// Query parameters accepted as equality filters.
    fn filters() -> Vec<(&'static str, Self::Column)> {
        Vec::new()
    }

    fn status_column() -> Option<Self::Column> {
        None
    }

    fn idx(model: &Self::Model) -> i32;
    fn uid(model: &Self::Model) -> &str;

    fn schema(mode: FormMode) -> Schema;

    fn create(form: Self::Form, row: NewRow) -> Result<Self::ActiveModel, StoreError>;

    /// Overwrite the editable columns of an existing row.
    fn update(
        active: &mut Self::ActiveModel,
        form: Self::Form,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Submitted attachment set. `None` leaves the current set untouched.
    fn files(_form: &Self::Form) -> Option<Vec<FileInput>> {
        None
    }

    fn to_dto(model: Self::Model, files: Vec<FileDto>) -> Self::Dto;
}

/// Fills in the associated types and the bookkeeping columns every entity shares.
macro_rules! entity_columns {
    ($entity:ident) => {
        type Entity = $entity::Entity;
        type Model = $entity::Model;
        type ActiveModel = $entity::ActiveModel;
        type Column = $entity::Column;

        fn idx_column() -> Self::Column {
            $entity::Column::Idx
        }

        fn uid_column() -> Self::Column {
            $entity::Column::Uid
        }

        fn is_use_column() -> Self::Column {
            $entity::Column::IsUse
        }

        fn updated_at_column() -> Self::Column {
            $entity::Column::UpdatedAt
        }

        fn idx(model: &Self::Model) -> i32 {
            model.idx
        }

        fn uid(model: &Self::Model) -> &str {
            &model.uid
        }
    };
}

pub(crate) use entity_columns;

/// `true` unless the form says otherwise.
pub(crate) fn default_true() -> bool {
    true
}

/// Trimmed text, with blank input treated as absent.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an optional timestamp field that already passed the `datetime` rule.
pub(crate) fn timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(backoffice_common::date::parse_text)
}
