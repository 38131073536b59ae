use backoffice_common::schema::FormMode;
use backoffice_common::{FcmPlatform, FcmTarget, Rule, Schema, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, NewRow, Resource, clean, entity_columns, timestamp};
use crate::entity::{fcm_alarm, fcm_message, fcm_token};
use crate::store::StoreError;

/// Registered device tokens.
pub struct FcmTokens;

#[derive(Debug, Deserialize)]
pub struct FcmTokenForm {
    pub user_uid: String,
    pub token: String,
    #[serde(default)]
    pub platform: FcmPlatform,
}

#[derive(Debug, Serialize)]
pub struct FcmTokenDto {
    pub idx: i32,
    pub uid: String,
    pub user_uid: String,
    pub token: String,
    pub platform: FcmPlatform,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for FcmTokens {
    entity_columns!(fcm_token);

    type Form = FcmTokenForm;
    type Dto = FcmTokenDto;

    const NAME: &'static str = "fcm_token";

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("user_uid", fcm_token::Column::UserUid),
            ("platform", fcm_token::Column::Platform),
        ]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("token", [Rule::required(), Rule::max_length(4096)])
            .field("platform", [Rule::one_of(FcmPlatform::VALUES)])
    }

    fn create(form: FcmTokenForm, row: NewRow) -> Result<fcm_token::ActiveModel, StoreError> {
        Ok(fcm_token::ActiveModel {
            uid: Set(row.uid),
            user_uid: Set(form.user_uid.trim().to_string()),
            token: Set(form.token.trim().to_string()),
            platform: Set(form.platform),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut fcm_token::ActiveModel,
        form: FcmTokenForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.token = Set(form.token.trim().to_string());
        active.platform = Set(form.platform);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: fcm_token::Model, _files: Vec<FileDto>) -> FcmTokenDto {
        FcmTokenDto {
            idx: m.idx,
            uid: m.uid,
            user_uid: m.user_uid,
            token: m.token,
            platform: m.platform,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

/// Push messages composed by operators. Records only; delivery happens elsewhere.
pub struct FcmMessages;

#[derive(Debug, Deserialize)]
pub struct FcmMessageForm {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub target: FcmTarget,
    #[serde(default)]
    pub user_uid: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FcmMessageDto {
    pub idx: i32,
    pub uid: String,
    pub title: String,
    pub body: String,
    pub target: FcmTarget,
    pub user_uid: Option<String>,
    pub sent_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A broadcast never keeps a recipient.
fn recipient(target: FcmTarget, user_uid: Option<String>) -> Option<String> {
    match target {
        FcmTarget::All => None,
        FcmTarget::User => clean(user_uid),
    }
}

impl Resource for FcmMessages {
    entity_columns!(fcm_message);

    type Form = FcmMessageForm;
    type Dto = FcmMessageDto;

    const NAME: &'static str = "fcm_message";

    fn search_columns() -> Vec<Self::Column> {
        vec![fcm_message::Column::Title, fcm_message::Column::Body]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("target", fcm_message::Column::Target),
            ("user_uid", fcm_message::Column::UserUid),
        ]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("title", [Rule::required(), Rule::max_length(100)])
            .field("body", [Rule::required(), Rule::max_length(1000)])
            .field("target", [Rule::one_of(FcmTarget::VALUES)])
            .field("user_uid", [Rule::max_length(64)])
            .field("sent_at", [Rule::datetime()])
    }

    fn create(form: FcmMessageForm, row: NewRow) -> Result<fcm_message::ActiveModel, StoreError> {
        Ok(fcm_message::ActiveModel {
            uid: Set(row.uid),
            title: Set(form.title.trim().to_string()),
            body: Set(form.body),
            target: Set(form.target),
            user_uid: Set(recipient(form.target, form.user_uid)),
            sent_at: Set(timestamp(form.sent_at.as_deref())),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut fcm_message::ActiveModel,
        form: FcmMessageForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.title = Set(form.title.trim().to_string());
        active.body = Set(form.body);
        active.target = Set(form.target);
        active.user_uid = Set(recipient(form.target, form.user_uid));
        active.sent_at = Set(timestamp(form.sent_at.as_deref()));
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: fcm_message::Model, _files: Vec<FileDto>) -> FcmMessageDto {
        FcmMessageDto {
            idx: m.idx,
            uid: m.uid,
            title: m.title,
            body: m.body,
            target: m.target,
            user_uid: m.user_uid,
            sent_at: date::format_optional(m.sent_at.as_ref()),
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

/// In-app notifications shown to one user.
pub struct FcmAlarms;

#[derive(Debug, Deserialize)]
pub struct FcmAlarmForm {
    pub user_uid: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct FcmAlarmDto {
    pub idx: i32,
    pub uid: String,
    pub user_uid: String,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for FcmAlarms {
    entity_columns!(fcm_alarm);

    type Form = FcmAlarmForm;
    type Dto = FcmAlarmDto;

    const NAME: &'static str = "fcm_alarm";

    fn search_columns() -> Vec<Self::Column> {
        vec![fcm_alarm::Column::Title]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("user_uid", fcm_alarm::Column::UserUid)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("title", [Rule::required(), Rule::max_length(100)])
            .field("body", [Rule::required(), Rule::max_length(1000)])
            .field("is_read", [Rule::boolean()])
    }

    fn create(form: FcmAlarmForm, row: NewRow) -> Result<fcm_alarm::ActiveModel, StoreError> {
        Ok(fcm_alarm::ActiveModel {
            uid: Set(row.uid),
            user_uid: Set(form.user_uid.trim().to_string()),
            title: Set(form.title.trim().to_string()),
            body: Set(form.body),
            is_read: Set(form.is_read),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut fcm_alarm::ActiveModel,
        form: FcmAlarmForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.title = Set(form.title.trim().to_string());
        active.body = Set(form.body);
        active.is_read = Set(form.is_read);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: fcm_alarm::Model, _files: Vec<FileDto>) -> FcmAlarmDto {
        FcmAlarmDto {
            idx: m.idx,
            uid: m.uid,
            user_uid: m.user_uid,
            title: m.title,
            body: m.body,
            is_read: m.is_read,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}
