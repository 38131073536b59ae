use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_common::{UserRole, UserStatus};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub idx: i32,
    #[sea_orm(unique)]
    pub uid: String,

    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub nickname: String,
    pub phone: Option<String>,
    /// Argon2 PHC string.
    pub password: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login_at: Option<DateTimeUtc>,

    pub is_use: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
