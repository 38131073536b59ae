use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A file reference hung off another row, matched by `(owner_type, owner_uid)`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    #[sea_orm(indexed)]
    pub owner_type: String,
    #[sea_orm(indexed)]
    pub owner_uid: String,
    pub name: String,
    pub url: String,
    pub size: i64, // in bytes
    pub mime: Option<String>,
    pub position: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
