//! Site content managed from the backoffice: banners, badges, popups, boards,
//! comments and the shared category tree.

use backoffice_common::schema::{self, FormMode};
use backoffice_common::{Rule, Schema, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, NewRow, Resource, clean, default_true, entity_columns, timestamp};
use crate::entity::{badge, banner, board, category, comment, popup};
use crate::store::StoreError;

pub struct Banners;

#[derive(Debug, Deserialize)]
pub struct BannerForm {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    pub position: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct BannerDto {
    pub idx: i32,
    pub uid: String,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: String,
    pub sort_order: i32,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Banners {
    entity_columns!(banner);

    type Form = BannerForm;
    type Dto = BannerDto;

    const NAME: &'static str = "banner";

    fn visible_column() -> Option<Self::Column> {
        Some(banner::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![banner::Column::Title]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("position", banner::Column::Position)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("title", [Rule::required(), Rule::max_length(100)])
            .field(
                "image_url",
                [Rule::required(), Rule::url(), Rule::max_length(2048)],
            )
            .field("link_url", [Rule::url(), Rule::max_length(2048)])
            .field("position", [Rule::required(), Rule::max_length(50)])
            .field("sort_order", [Rule::range(Some(0), Some(9999))])
            .field("starts_at", [Rule::datetime()])
            .field("ends_at", [Rule::datetime()])
            .field("is_visible", [Rule::boolean()])
    }

    fn create(form: BannerForm, row: NewRow) -> Result<banner::ActiveModel, StoreError> {
        Ok(banner::ActiveModel {
            uid: Set(row.uid),
            title: Set(form.title.trim().to_string()),
            image_url: Set(form.image_url.trim().to_string()),
            link_url: Set(clean(form.link_url)),
            position: Set(form.position.trim().to_string()),
            sort_order: Set(form.sort_order),
            starts_at: Set(timestamp(form.starts_at.as_deref())),
            ends_at: Set(timestamp(form.ends_at.as_deref())),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut banner::ActiveModel,
        form: BannerForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.title = Set(form.title.trim().to_string());
        active.image_url = Set(form.image_url.trim().to_string());
        active.link_url = Set(clean(form.link_url));
        active.position = Set(form.position.trim().to_string());
        active.sort_order = Set(form.sort_order);
        active.starts_at = Set(timestamp(form.starts_at.as_deref()));
        active.ends_at = Set(timestamp(form.ends_at.as_deref()));
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: banner::Model, _files: Vec<FileDto>) -> BannerDto {
        BannerDto {
            idx: m.idx,
            uid: m.uid,
            title: m.title,
            image_url: m.image_url,
            link_url: m.link_url,
            position: m.position,
            sort_order: m.sort_order,
            starts_at: date::format_optional(m.starts_at.as_ref()),
            ends_at: date::format_optional(m.ends_at.as_ref()),
            is_visible: m.is_visible,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct Badges;

#[derive(Debug, Deserialize)]
pub struct BadgeForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BadgeDto {
    pub idx: i32,
    pub uid: String,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Badges {
    entity_columns!(badge);

    type Form = BadgeForm;
    type Dto = BadgeDto;

    const NAME: &'static str = "badge";

    fn search_columns() -> Vec<Self::Column> {
        vec![badge::Column::Name]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("name", [Rule::required(), Rule::max_length(50)])
            .field("description", [Rule::max_length(500)])
            .field("icon_url", [Rule::url(), Rule::max_length(2048)])
    }

    fn create(form: BadgeForm, row: NewRow) -> Result<badge::ActiveModel, StoreError> {
        Ok(badge::ActiveModel {
            uid: Set(row.uid),
            name: Set(form.name.trim().to_string()),
            description: Set(clean(form.description)),
            icon_url: Set(clean(form.icon_url)),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut badge::ActiveModel,
        form: BadgeForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.name = Set(form.name.trim().to_string());
        active.description = Set(clean(form.description));
        active.icon_url = Set(clean(form.icon_url));
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: badge::Model, _files: Vec<FileDto>) -> BadgeDto {
        BadgeDto {
            idx: m.idx,
            uid: m.uid,
            name: m.name,
            description: m.description,
            icon_url: m.icon_url,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct Popups;

#[derive(Debug, Deserialize)]
pub struct PopupForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct PopupDto {
    pub idx: i32,
    pub uid: String,
    pub title: String,
    pub content: String,
    pub link_url: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Popups {
    entity_columns!(popup);

    type Form = PopupForm;
    type Dto = PopupDto;

    const NAME: &'static str = "popup";

    fn visible_column() -> Option<Self::Column> {
        Some(popup::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![popup::Column::Title]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("title", [Rule::required(), Rule::max_length(100)])
            .field("content", [Rule::required(), Rule::max_length(5000)])
            .field("link_url", [Rule::url(), Rule::max_length(2048)])
            .field("starts_at", [Rule::datetime()])
            .field("ends_at", [Rule::datetime()])
            .field("is_visible", [Rule::boolean()])
    }

    fn create(form: PopupForm, row: NewRow) -> Result<popup::ActiveModel, StoreError> {
        Ok(popup::ActiveModel {
            uid: Set(row.uid),
            title: Set(form.title.trim().to_string()),
            content: Set(form.content),
            link_url: Set(clean(form.link_url)),
            starts_at: Set(timestamp(form.starts_at.as_deref())),
            ends_at: Set(timestamp(form.ends_at.as_deref())),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut popup::ActiveModel,
        form: PopupForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.title = Set(form.title.trim().to_string());
        active.content = Set(form.content);
        active.link_url = Set(clean(form.link_url));
        active.starts_at = Set(timestamp(form.starts_at.as_deref()));
        active.ends_at = Set(timestamp(form.ends_at.as_deref()));
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: popup::Model, _files: Vec<FileDto>) -> PopupDto {
        PopupDto {
            idx: m.idx,
            uid: m.uid,
            title: m.title,
            content: m.content,
            link_url: m.link_url,
            starts_at: date::format_optional(m.starts_at.as_ref()),
            ends_at: date::format_optional(m.ends_at.as_ref()),
            is_visible: m.is_visible,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct Boards;

#[derive(Debug, Deserialize)]
pub struct BoardForm {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct BoardDto {
    pub idx: i32,
    pub uid: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Boards {
    entity_columns!(board);

    type Form = BoardForm;
    type Dto = BoardDto;

    const NAME: &'static str = "board";

    fn visible_column() -> Option<Self::Column> {
        Some(board::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![board::Column::Name, board::Column::Slug]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("name", [Rule::required(), Rule::max_length(50)])
            .field("slug", schema::slug())
            .field("description", [Rule::max_length(500)])
            .field("is_visible", [Rule::boolean()])
    }

    fn create(form: BoardForm, row: NewRow) -> Result<board::ActiveModel, StoreError> {
        Ok(board::ActiveModel {
            uid: Set(row.uid),
            name: Set(form.name.trim().to_string()),
            slug: Set(form.slug.trim().to_string()),
            description: Set(clean(form.description)),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut board::ActiveModel,
        form: BoardForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.name = Set(form.name.trim().to_string());
        active.slug = Set(form.slug.trim().to_string());
        active.description = Set(clean(form.description));
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: board::Model, _files: Vec<FileDto>) -> BoardDto {
        BoardDto {
            idx: m.idx,
            uid: m.uid,
            name: m.name,
            slug: m.slug,
            description: m.description,
            is_visible: m.is_visible,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct Comments;

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub target_uid: String,
    pub user_uid: String,
    #[serde(default)]
    pub parent_uid: Option<String>,
    pub content: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub idx: i32,
    pub uid: String,
    pub target_uid: String,
    pub user_uid: String,
    pub parent_uid: Option<String>,
    pub content: String,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Comments {
    entity_columns!(comment);

    type Form = CommentForm;
    type Dto = CommentDto;

    const NAME: &'static str = "comment";

    fn visible_column() -> Option<Self::Column> {
        Some(comment::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![comment::Column::Content]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("target_uid", comment::Column::TargetUid),
            ("user_uid", comment::Column::UserUid),
            ("parent_uid", comment::Column::ParentUid),
        ]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("target_uid", [Rule::required(), Rule::max_length(64)])
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("parent_uid", [Rule::max_length(64)])
            .field("content", [Rule::required(), Rule::max_length(2000)])
            .field("is_visible", [Rule::boolean()])
    }

    fn create(form: CommentForm, row: NewRow) -> Result<comment::ActiveModel, StoreError> {
        Ok(comment::ActiveModel {
            uid: Set(row.uid),
            target_uid: Set(form.target_uid.trim().to_string()),
            user_uid: Set(form.user_uid.trim().to_string()),
            parent_uid: Set(clean(form.parent_uid)),
            content: Set(form.content),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut comment::ActiveModel,
        form: CommentForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.target_uid = Set(form.target_uid.trim().to_string());
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.parent_uid = Set(clean(form.parent_uid));
        active.content = Set(form.content);
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: comment::Model, _files: Vec<FileDto>) -> CommentDto {
        CommentDto {
            idx: m.idx,
            uid: m.uid,
            target_uid: m.target_uid,
            user_uid: m.user_uid,
            parent_uid: m.parent_uid,
            content: m.content,
            is_visible: m.is_visible,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct Categories;

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub parent_uid: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub idx: i32,
    pub uid: String,
    pub name: String,
    pub parent_uid: Option<String>,
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Categories {
    entity_columns!(category);

    type Form = CategoryForm;
    type Dto = CategoryDto;

    const NAME: &'static str = "category";

    fn visible_column() -> Option<Self::Column> {
        Some(category::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![category::Column::Name]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("parent_uid", category::Column::ParentUid)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("name", [Rule::required(), Rule::max_length(50)])
            .field("parent_uid", [Rule::max_length(64)])
            .field("sort_order", [Rule::range(Some(0), Some(9999))])
            .field("is_visible", [Rule::boolean()])
    }

    fn create(form: CategoryForm, row: NewRow) -> Result<category::ActiveModel, StoreError> {
        Ok(category::ActiveModel {
            uid: Set(row.uid),
            name: Set(form.name.trim().to_string()),
            parent_uid: Set(clean(form.parent_uid)),
            sort_order: Set(form.sort_order),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut category::ActiveModel,
        form: CategoryForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.name = Set(form.name.trim().to_string());
        active.parent_uid = Set(clean(form.parent_uid));
        active.sort_order = Set(form.sort_order);
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: category::Model, _files: Vec<FileDto>) -> CategoryDto {
        CategoryDto {
            idx: m.idx,
            uid: m.uid,
            name: m.name,
            parent_uid: m.parent_uid,
            sort_order: m.sort_order,
            is_visible: m.is_visible,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}
