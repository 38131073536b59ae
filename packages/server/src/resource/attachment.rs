use std::collections::HashMap;

use backoffice_common::date;
use chrono::Utc;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::entity::attachment;

/// One entry of a submitted `files` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileInput {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub mime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FileDto {
    pub uid: String,
    pub name: String,
    pub url: String,
    /// Size in bytes.
    pub size: i64,
    pub mime: Option<String>,
    #[schema(example = "2024-05-01 09:30:00")]
    pub created_at: String,
}

impl From<attachment::Model> for FileDto {
    fn from(m: attachment::Model) -> Self {
        Self {
            uid: m.uid,
            name: m.name,
            url: m.url,
            size: m.size,
            mime: m.mime,
            created_at: date::format_datetime(&m.created_at),
        }
    }
}

/// Attachments of every listed owner, fetched in one query and grouped by owner uid.
pub async fn load<C: ConnectionTrait>(
    db: &C,
    owner_type: &str,
    owner_uids: Vec<String>,
) -> Result<HashMap<String, Vec<FileDto>>, DbErr> {
    let mut grouped: HashMap<String, Vec<FileDto>> = HashMap::new();
    if owner_uids.is_empty() {
        return Ok(grouped);
    }

    let rows = attachment::Entity::find()
        .filter(attachment::Column::OwnerType.eq(owner_type))
        .filter(attachment::Column::OwnerUid.is_in(owner_uids))
        .order_by_asc(attachment::Column::Position)
        .order_by_asc(attachment::Column::Idx)
        .all(db)
        .await?;

    for row in rows {
        grouped
            .entry(row.owner_uid.clone())
            .or_default()
            .push(row.into());
    }
    Ok(grouped)
}

/// Drop the owner's current attachments and store `files` in submitted order.
pub async fn replace<C: ConnectionTrait>(
    db: &C,
    owner_type: &str,
    owner_uid: &str,
    files: Vec<FileInput>,
) -> Result<(), DbErr> {
    attachment::Entity::delete_many()
        .filter(attachment::Column::OwnerType.eq(owner_type))
        .filter(attachment::Column::OwnerUid.eq(owner_uid))
        .exec(db)
        .await?;

    if files.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let rows = files
        .into_iter()
        .enumerate()
        .map(|(position, file)| attachment::ActiveModel {
            uid: Set(uuid::Uuid::now_v7().to_string()),
            owner_type: Set(owner_type.to_string()),
            owner_uid: Set(owner_uid.to_string()),
            name: Set(file.name.trim().to_string()),
            url: Set(file.url.trim().to_string()),
            size: Set(file.size),
            mime: Set(file.mime),
            position: Set(position as i32),
            created_at: Set(now),
            ..Default::default()
        });

    attachment::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}
