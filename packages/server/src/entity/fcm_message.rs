use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_common::FcmTarget;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fcm_message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    pub title: String,
    pub body: String,
    pub target: FcmTarget,
    pub user_uid: Option<String>, // set when target is `user`
    pub sent_at: Option<DateTimeUtc>,

    pub is_use: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
