use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banner")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: String, // placement slot, e.g. "main_top"
    pub sort_order: i32,
    pub starts_at: Option<DateTimeUtc>,
    pub ends_at: Option<DateTimeUtc>,

    pub is_visible: bool,
    pub is_use: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
