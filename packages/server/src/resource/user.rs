use backoffice_common::schema::{self, FormMode};
use backoffice_common::validation::CharClass;
use backoffice_common::{Rule, Schema, UserRole, UserStatus, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, NewRow, Resource, entity_columns};
use crate::entity::user;
use crate::store::StoreError;
use crate::utils::hash;

/// Backoffice accounts.
pub struct Users;

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Required on create. On update, absent keeps the current password.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserDto {
    pub idx: i32,
    #[schema(example = "0195f3a2-7c1e-7b9a-9f00-1a2b3c4d5e6f")]
    pub uid: String,
    #[schema(example = "admin@example.com")]
    pub email: String,
    pub name: String,
    pub nickname: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login_at: Option<String>,
    #[schema(example = "2024-05-01 09:30:00")]
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserDto {
    fn from(m: user::Model) -> Self {
        Self {
            idx: m.idx,
            uid: m.uid,
            email: m.email,
            name: m.name,
            nickname: m.nickname,
            phone: m.phone,
            role: m.role,
            status: m.status,
            last_login_at: date::format_optional(m.last_login_at.as_ref()),
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

fn hashed(password: &str) -> Result<String, StoreError> {
    hash::hash_password(password).map_err(|e| StoreError::Prepare(format!("password hash: {e}")))
}

impl Resource for Users {
    entity_columns!(user);

    type Form = UserForm;
    type Dto = UserDto;

    const NAME: &'static str = "user";
    const STATUSES: &'static [&'static str] = UserStatus::VALUES;
    const ADMIN_FIELDS: &'static [&'static str] = &["role", "status"];

    fn search_columns() -> Vec<Self::Column> {
        vec![
            user::Column::Email,
            user::Column::Name,
            user::Column::Nickname,
        ]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("role", user::Column::Role), ("status", user::Column::Status)]
    }

    fn status_column() -> Option<Self::Column> {
        Some(user::Column::Status)
    }

    fn schema(mode: FormMode) -> Schema {
        Schema::new()
            .field(
                "email",
                [Rule::required(), Rule::email(), Rule::max_length(255)],
            )
            .field("name", [Rule::required(), Rule::max_length(50)])
            .field("nickname", [Rule::max_length(50)])
            .field(
                "phone",
                [
                    Rule::max_length(20),
                    Rule::only(&[CharClass::Digit], "-+ "),
                ],
            )
            .field(
                "password",
                mode.required_on_create()
                    .into_iter()
                    .chain(schema::password_rules()),
            )
            .field("role", [Rule::one_of(UserRole::VALUES)])
            .field("status", [Rule::one_of(UserStatus::VALUES)])
    }

    fn create(form: UserForm, row: NewRow) -> Result<user::ActiveModel, StoreError> {
        let password = form
            .password
            .as_deref()
            .ok_or_else(|| StoreError::Prepare("password is required".into()))?;
        let name = form.name.trim().to_string();

        Ok(user::ActiveModel {
            uid: Set(row.uid),
            email: Set(form.email.trim().to_lowercase()),
            nickname: Set(form
                .nickname
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| name.clone())),
            name: Set(name),
            phone: Set(form.phone),
            password: Set(hashed(password)?),
            role: Set(form.role.unwrap_or_default()),
            status: Set(form.status.unwrap_or_default()),
            last_login_at: Set(None),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut user::ActiveModel,
        form: UserForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.email = Set(form.email.trim().to_lowercase());
        active.name = Set(form.name.trim().to_string());
        if let Some(nickname) = form.nickname {
            active.nickname = Set(nickname.trim().to_string());
        }
        active.phone = Set(form.phone);
        if let Some(password) = form.password.as_deref() {
            active.password = Set(hashed(password)?);
        }
        if let Some(role) = form.role {
            active.role = Set(role);
        }
        if let Some(status) = form.status {
            active.status = Set(status);
        }
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(model: user::Model, _files: Vec<FileDto>) -> UserDto {
        model.into()
    }
}
