use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "address")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    pub user_uid: String,
    pub label: String,
    pub recipient: String,
    pub phone: String,
    pub zipcode: String,
    pub address1: String,
    pub address2: Option<String>,
    pub is_default: bool,

    pub is_use: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
