use backoffice_common::schema::{self, FormMode};
use backoffice_common::validation::CharClass;
use backoffice_common::{Rule, Schema, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, FileInput, NewRow, Resource, clean, default_true, entity_columns};
use crate::entity::{blog_category, blog_post, blog_tag};
use crate::store::StoreError;

/// Split a comma list into trimmed, de-duplicated tags, preserving order.
fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn join_tags(raw: Option<&str>) -> String {
    split_tags(raw.unwrap_or_default()).join(",")
}

pub struct BlogPosts;

#[derive(Debug, Deserialize)]
pub struct BlogPostForm {
    #[serde(default)]
    pub category_uid: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author_uid: Option<String>,
    /// Comma separated.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub files: Option<Vec<FileInput>>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostDto {
    pub idx: i32,
    pub uid: String,
    pub category_uid: Option<String>,
    pub title: String,
    pub content: String,
    pub author_uid: Option<String>,
    pub tags: Vec<String>,
    pub view_count: i32,
    pub is_visible: bool,
    pub files: Vec<FileDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for BlogPosts {
    entity_columns!(blog_post);

    type Form = BlogPostForm;
    type Dto = BlogPostDto;

    const NAME: &'static str = "blog_post";
    const ATTACHMENTS: bool = true;

    fn visible_column() -> Option<Self::Column> {
        Some(blog_post::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![blog_post::Column::Title, blog_post::Column::Tags]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("category_uid", blog_post::Column::CategoryUid),
            ("author_uid", blog_post::Column::AuthorUid),
        ]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("category_uid", [Rule::max_length(64)])
            .field("title", [Rule::required(), Rule::max_length(200)])
            .field("content", [Rule::required()])
            .field("author_uid", [Rule::max_length(64)])
            .field("tags", [Rule::max_length(500)])
            .field("is_visible", [Rule::boolean()])
            .field("files", schema::files())
    }

    fn create(form: BlogPostForm, row: NewRow) -> Result<blog_post::ActiveModel, StoreError> {
        Ok(blog_post::ActiveModel {
            uid: Set(row.uid),
            category_uid: Set(clean(form.category_uid)),
            title: Set(form.title.trim().to_string()),
            content: Set(form.content),
            author_uid: Set(clean(form.author_uid)),
            tags: Set(join_tags(form.tags.as_deref())),
            view_count: Set(0),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut blog_post::ActiveModel,
        form: BlogPostForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.category_uid = Set(clean(form.category_uid));
        active.title = Set(form.title.trim().to_string());
        active.content = Set(form.content);
        active.author_uid = Set(clean(form.author_uid));
        active.tags = Set(join_tags(form.tags.as_deref()));
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn files(form: &BlogPostForm) -> Option<Vec<FileInput>> {
        form.files.clone()
    }

    fn to_dto(m: blog_post::Model, files: Vec<FileDto>) -> BlogPostDto {
        BlogPostDto {
            idx: m.idx,
            uid: m.uid,
            category_uid: m.category_uid,
            title: m.title,
            content: m.content,
            author_uid: m.author_uid,
            tags: split_tags(&m.tags),
            view_count: m.view_count,
            is_visible: m.is_visible,
            files,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct BlogCategories;

#[derive(Debug, Deserialize)]
pub struct BlogCategoryForm {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct BlogCategoryDto {
    pub idx: i32,
    pub uid: String,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for BlogCategories {
    entity_columns!(blog_category);

    type Form = BlogCategoryForm;
    type Dto = BlogCategoryDto;

    const NAME: &'static str = "blog_category";

    fn visible_column() -> Option<Self::Column> {
        Some(blog_category::Column::IsVisible)
    }

    fn search_columns() -> Vec<Self::Column> {
        vec![blog_category::Column::Name, blog_category::Column::Slug]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("name", [Rule::required(), Rule::max_length(50)])
            .field("slug", schema::slug())
            .field("sort_order", [Rule::range(Some(0), Some(9999))])
            .field("is_visible", [Rule::boolean()])
    }

    fn create(
        form: BlogCategoryForm,
        row: NewRow,
    ) -> Result<blog_category::ActiveModel, StoreError> {
        Ok(blog_category::ActiveModel {
            uid: Set(row.uid),
            name: Set(form.name.trim().to_string()),
            slug: Set(form.slug.trim().to_string()),
            sort_order: Set(form.sort_order),
            is_visible: Set(form.is_visible),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut blog_category::ActiveModel,
        form: BlogCategoryForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.name = Set(form.name.trim().to_string());
        active.slug = Set(form.slug.trim().to_string());
        active.sort_order = Set(form.sort_order);
        active.is_visible = Set(form.is_visible);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: blog_category::Model, _files: Vec<FileDto>) -> BlogCategoryDto {
        BlogCategoryDto {
            idx: m.idx,
            uid: m.uid,
            name: m.name,
            slug: m.slug,
            sort_order: m.sort_order,
            is_visible: m.is_visible,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct BlogTags;

#[derive(Debug, Deserialize)]
pub struct BlogTagForm {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BlogTagDto {
    pub idx: i32,
    pub uid: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for BlogTags {
    entity_columns!(blog_tag);

    type Form = BlogTagForm;
    type Dto = BlogTagDto;

    const NAME: &'static str = "blog_tag";

    fn search_columns() -> Vec<Self::Column> {
        vec![blog_tag::Column::Name]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new().field(
            "name",
            [Rule::required(), Rule::max_length(30), Rule::only(TAG_CHARS, "-_")],
        )
    }

    fn create(form: BlogTagForm, row: NewRow) -> Result<blog_tag::ActiveModel, StoreError> {
        Ok(blog_tag::ActiveModel {
            uid: Set(row.uid),
            name: Set(form.name.trim().to_string()),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut blog_tag::ActiveModel,
        form: BlogTagForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.name = Set(form.name.trim().to_string());
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: blog_tag::Model, _files: Vec<FileDto>) -> BlogTagDto {
        BlogTagDto {
            idx: m.idx,
            uid: m.uid,
            name: m.name,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

/// Tags may not contain commas since posts store them as a comma list.
const TAG_CHARS: &[CharClass] = &[CharClass::Letter, CharClass::Digit];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        assert_eq!(split_tags(" rust, web ,rust,,"), ["rust", "web"]);
        assert_eq!(join_tags(Some("a, b, a")), "a,b");
        assert_eq!(join_tags(None), "");
    }
}
