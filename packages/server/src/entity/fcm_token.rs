use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_common::FcmPlatform;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fcm_token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    pub user_uid: String,
    #[sea_orm(unique)]
    pub token: String,
    pub platform: FcmPlatform,

    pub is_use: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
