use backoffice_common::schema::{self, FormMode};
use backoffice_common::{OrderStatus, Rule, Schema, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, FileInput, NewRow, Resource, clean, default_true, entity_columns};
use crate::entity::{shop_item, shop_order, shop_review};
use crate::store::StoreError;

pub struct ShopItems;

#[derive(Debug, Deserialize)]
pub struct ShopItemForm {
    #[serde(default)]
    pub category_uid: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub files: Option<Vec<FileInput>>,
}

#[derive(Debug, Serialize)]
pub struct ShopItemDto {
    pub idx: i32,
    pub uid: String,
    pub category_uid: Option<String>,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
    pub is_visible: bool,
    pub files: Vec<FileDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for ShopItems {
    entity_columns!(shop_item);

    type Form = ShopItemForm;
    type Dto = ShopItemDto;

    const NAME: &'static str = "shop_item";
    const ATTACHMENTS: bool = true;

    fn visible_column() -> Option<Self::Column> {
        Some(shop_item::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![shop_item::Column::Name]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("category_uid", shop_item::Column::CategoryUid)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("category_uid", [Rule::max_length(64)])
            .field("name", [Rule::required(), Rule::max_length(100)])
            .field("description", [Rule::max_length(5000)])
            .field("price", [Rule::required(), Rule::range(Some(0), None)])
            .field("stock", [Rule::range(Some(0), Some(i32::MAX as i64))])
            .field("is_visible", [Rule::boolean()])
            .field("files", schema::files())
    }

    fn create(form: ShopItemForm, row: NewRow) -> Result<shop_item::ActiveModel, StoreError> {
        Ok(shop_item::ActiveModel {
            uid: Set(row.uid),
            category_uid: Set(clean(form.category_uid)),
            name: Set(form.name.trim().to_string()),
            description: Set(form.description),
            price: Set(form.price),
            stock: Set(form.stock),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut shop_item::ActiveModel,
        form: ShopItemForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.category_uid = Set(clean(form.category_uid));
        active.name = Set(form.name.trim().to_string());
        active.description = Set(form.description);
        active.price = Set(form.price);
        active.stock = Set(form.stock);
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn files(form: &ShopItemForm) -> Option<Vec<FileInput>> {
        form.files.clone()
    }

    fn to_dto(m: shop_item::Model, files: Vec<FileDto>) -> ShopItemDto {
        ShopItemDto {
            idx: m.idx,
            uid: m.uid,
            category_uid: m.category_uid,
            name: m.name,
            description: m.description,
            price: m.price,
            stock: m.stock,
            is_visible: m.is_visible,
            files,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

/// Orders. Operators move them through [`OrderStatus`] with the status mutation.
pub struct ShopOrders;

#[derive(Debug, Deserialize)]
pub struct ShopOrderForm {
    pub user_uid: String,
    pub item_uid: String,
    pub quantity: i32,
    pub total_price: i64,
    /// Starts at `pending` when absent. On update, absent keeps the current status.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShopOrderDto {
    pub idx: i32,
    pub uid: String,
    pub user_uid: String,
    pub item_uid: String,
    pub quantity: i32,
    pub total_price: i64,
    pub status: OrderStatus,
    pub memo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for ShopOrders {
    entity_columns!(shop_order);

    type Form = ShopOrderForm;
    type Dto = ShopOrderDto;

    const NAME: &'static str = "shop_order";
    const STATUSES: &'static [&'static str] = OrderStatus::VALUES;
    const ADMIN_FIELDS: &'static [&'static str] = &["status"];

    fn search_columns() -> Vec<Self::Column> {
        vec![shop_order::Column::Memo]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("status", shop_order::Column::Status),
            ("user_uid", shop_order::Column::UserUid),
            ("item_uid", shop_order::Column::ItemUid),
        ]
    }

    fn status_column() -> Option<Self::Column> {
        Some(shop_order::Column::Status)
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("item_uid", [Rule::required(), Rule::max_length(64)])
            .field("quantity", [Rule::required(), Rule::range(Some(1), Some(999))])
            .field("total_price", [Rule::required(), Rule::range(Some(0), None)])
            .field("status", [Rule::one_of(OrderStatus::VALUES)])
            .field("memo", [Rule::max_length(500)])
    }

    fn create(form: ShopOrderForm, row: NewRow) -> Result<shop_order::ActiveModel, StoreError> {
        Ok(shop_order::ActiveModel {
            uid: Set(row.uid),
            user_uid: Set(form.user_uid.trim().to_string()),
            item_uid: Set(form.item_uid.trim().to_string()),
            quantity: Set(form.quantity),
            total_price: Set(form.total_price),
            status: Set(form.status.unwrap_or_default()),
            memo: Set(clean(form.memo)),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut shop_order::ActiveModel,
        form: ShopOrderForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.item_uid = Set(form.item_uid.trim().to_string());
        active.quantity = Set(form.quantity);
        active.total_price = Set(form.total_price);
        if let Some(status) = form.status {
            active.status = Set(status);
        }
        active.memo = Set(clean(form.memo));
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: shop_order::Model, _files: Vec<FileDto>) -> ShopOrderDto {
        ShopOrderDto {
            idx: m.idx,
            uid: m.uid,
            user_uid: m.user_uid,
            item_uid: m.item_uid,
            quantity: m.quantity,
            total_price: m.total_price,
            status: m.status,
            memo: m.memo,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct ShopReviews;

#[derive(Debug, Deserialize)]
pub struct ShopReviewForm {
    pub item_uid: String,
    pub user_uid: String,
    pub rating: i32,
    pub content: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub files: Option<Vec<FileInput>>,
}

#[derive(Debug, Serialize)]
pub struct ShopReviewDto {
    pub idx: i32,
    pub uid: String,
    pub item_uid: String,
    pub user_uid: String,
    pub rating: i32,
    pub content: String,
    pub is_visible: bool,
    pub files: Vec<FileDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for ShopReviews {
    entity_columns!(shop_review);

    type Form = ShopReviewForm;
    type Dto = ShopReviewDto;

    const NAME: &'static str = "shop_review";
    const ATTACHMENTS: bool = true;

    fn visible_column() -> Option<Self::Column> {
        Some(shop_review::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![shop_review::Column::Content]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("item_uid", shop_review::Column::ItemUid),
            ("user_uid", shop_review::Column::UserUid),
        ]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("item_uid", [Rule::required(), Rule::max_length(64)])
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("rating", [Rule::required(), Rule::range(Some(1), Some(5))])
            .field("content", [Rule::required(), Rule::max_length(2000)])
            .field("is_visible", [Rule::boolean()])
            .field("files", schema::files())
    }

    fn create(form: ShopReviewForm, row: NewRow) -> Result<shop_review::ActiveModel, StoreError> {
        Ok(shop_review::ActiveModel {
            uid: Set(row.uid),
            item_uid: Set(form.item_uid.trim().to_string()),
            user_uid: Set(form.user_uid.trim().to_string()),
            rating: Set(form.rating),
            content: Set(form.content),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut shop_review::ActiveModel,
        form: ShopReviewForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.item_uid = Set(form.item_uid.trim().to_string());
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.rating = Set(form.rating);
        active.content = Set(form.content);
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn files(form: &ShopReviewForm) -> Option<Vec<FileInput>> {
        form.files.clone()
    }

    fn to_dto(m: shop_review::Model, files: Vec<FileDto>) -> ShopReviewDto {
        ShopReviewDto {
            idx: m.idx,
            uid: m.uid,
            item_uid: m.item_uid,
            user_uid: m.user_uid,
            rating: m.rating,
            content: m.content,
            is_visible: m.is_visible,
            files,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}
