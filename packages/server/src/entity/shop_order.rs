use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_common::OrderStatus;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    pub user_uid: String,
    pub item_uid: String,
    pub quantity: i32,
    pub total_price: i64,
    pub status: OrderStatus,
    pub memo: Option<String>,

    pub is_use: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
