//! Storage port used by the resource actions.
//!
//! Actions only see [`Store`]; [`SeaStore`] is the database implementation.
//! Tests substitute a fake to observe which calls an action makes.

mod sea;

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};

use crate::resource::Resource;

pub use sea::SeaStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    /// The form could not be turned into a row, e.g. password hashing failed.
    #[error("could not prepare row: {0}")]
    Prepare(String),
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
            _ => StoreError::Db(err),
        }
    }
}

/// How a single row is addressed from a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Idx(i32),
    Uid(String),
}

impl Identifier {
    /// All-digit segments address the internal key, anything else the uid.
    pub fn parse(segment: &str) -> Self {
        let segment = segment.trim();
        if !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit())
            && let Ok(idx) = segment.parse()
        {
            return Identifier::Idx(idx);
        }
        Identifier::Uid(segment.to_string())
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Idx(idx) => write!(f, "{idx}"),
            Identifier::Uid(uid) => f.write_str(uid),
        }
    }
}

/// Rows addressed by a bulk mutation. Matches rows whose key is in `idx`
/// or whose uid is in `uids`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub idx: Vec<i32>,
    pub uids: Vec<String>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty() && self.uids.is_empty()
    }
}

/// Store-level list request. `after` is the key of the last row already seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub after: Option<i32>,
    pub limit: u64,
    pub search: Option<String>,
    pub visible: Option<bool>,
    /// Equality filters as `(name, value)`; names the resource does not
    /// declare are ignored.
    pub filters: Vec<(String, String)>,
}

/// One page of rows in descending key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Key of the last delivered row when more rows follow it.
    pub next: Option<i32>,
}

#[async_trait]
pub trait Store<R: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<R::Dto>, StoreError>;

    /// The live row, or [`StoreError::NotFound`].
    async fn find(&self, id: &Identifier) -> Result<R::Dto, StoreError>;

    async fn create(&self, form: R::Form) -> Result<R::Dto, StoreError>;

    async fn update(&self, id: &Identifier, form: R::Form) -> Result<R::Dto, StoreError>;

    /// Soft-delete every live target. Returns the number of rows changed.
    async fn delete(&self, targets: &Targets) -> Result<u64, StoreError>;

    async fn update_status(&self, targets: &Targets, status: &str) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_address_the_internal_key() {
        assert_eq!(Identifier::parse("42"), Identifier::Idx(42));
        assert_eq!(Identifier::parse(" 7 "), Identifier::Idx(7));
    }

    #[test]
    fn everything_else_is_a_uid() {
        assert_eq!(
            Identifier::parse("0195f3a2-7c1e-7b9a-9f00-1a2b3c4d5e6f"),
            Identifier::Uid("0195f3a2-7c1e-7b9a-9f00-1a2b3c4d5e6f".into())
        );
        assert_eq!(Identifier::parse("-3"), Identifier::Uid("-3".into()));
        // Too large for the key column.
        assert_eq!(
            Identifier::parse("99999999999"),
            Identifier::Uid("99999999999".into())
        );
    }

    #[test]
    fn targets_without_ids_are_empty() {
        assert!(Targets::default().is_empty());
        assert!(
            !Targets {
                idx: vec![1],
                uids: Vec::new()
            }
            .is_empty()
        );
    }
}
