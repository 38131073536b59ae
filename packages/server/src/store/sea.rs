use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;

use super::{Identifier, ListQuery, Page, Store, StoreError, Targets};
use crate::resource::{NewRow, Resource, attachment};

/// `%term%` with the LIKE wildcards in `term` matched literally.
fn escape_like(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(escape_like(term)).escape('\\')
}

/// [`Store`] backed by the resource's sea-orm entity.
pub struct SeaStore<R> {
    db: DatabaseConnection,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> SeaStore<R> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _resource: PhantomData,
        }
    }

    /// Rows that have not been soft-deleted.
    fn live() -> Select<R::Entity> {
        R::Entity::find().filter(R::is_use_column().eq(true))
    }

    fn identify(id: &Identifier) -> Condition {
        match id {
            Identifier::Idx(idx) => Condition::all().add(R::idx_column().eq(*idx)),
            Identifier::Uid(uid) => Condition::all().add(R::uid_column().eq(uid.as_str())),
        }
    }

    fn targeted(targets: &Targets) -> Condition {
        let mut condition = Condition::any();
        if !targets.idx.is_empty() {
            condition = condition.add(R::idx_column().is_in(targets.idx.clone()));
        }
        if !targets.uids.is_empty() {
            condition = condition.add(R::uid_column().is_in(targets.uids.clone()));
        }
        condition
    }

    async fn to_dtos(&self, models: Vec<R::Model>) -> Result<Vec<R::Dto>, StoreError> {
        if !R::ATTACHMENTS {
            return Ok(models
                .into_iter()
                .map(|m| R::to_dto(m, Vec::new()))
                .collect());
        }

        let owners = models.iter().map(|m| R::uid(m).to_string()).collect();
        let mut files = attachment::load(&self.db, R::NAME, owners).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let owned = files.remove(R::uid(&m)).unwrap_or_default();
                R::to_dto(m, owned)
            })
            .collect())
    }

    async fn to_dto(&self, model: R::Model) -> Result<R::Dto, StoreError> {
        self.to_dtos(vec![model])
            .await?
            .pop()
            .ok_or(StoreError::NotFound)
    }

    /// Set `column` to `value` on every live target, bumping `updated_at`.
    async fn mark(
        &self,
        targets: &Targets,
        column: R::Column,
        value: sea_orm::Value,
    ) -> Result<u64, StoreError> {
        if targets.is_empty() {
            return Ok(0);
        }

        let result = R::Entity::update_many()
            .col_expr(column, Expr::value(value))
            .col_expr(R::updated_at_column(), Expr::value(Utc::now()))
            .filter(R::is_use_column().eq(true))
            .filter(Self::targeted(targets))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[async_trait]
impl<R: Resource> Store<R> for SeaStore<R> {
    async fn list(&self, query: &ListQuery) -> Result<Page<R::Dto>, StoreError> {
        let mut select = Self::live();

        if let Some(after) = query.after {
            select = select.filter(R::idx_column().lt(after));
        }

        if let Some(term) = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            let columns = R::search_columns();
            if !columns.is_empty() {
                let matches = columns
                    .into_iter()
                    .fold(Condition::any(), |c, col| c.add(col.like(contains_pattern(term))));
                select = select.filter(matches);
            }
        }

        if let (Some(visible), Some(column)) = (query.visible, R::visible_column()) {
            select = select.filter(column.eq(visible));
        }

        let declared = R::filters();
        for (name, value) in &query.filters {
            if let Some((_, column)) = declared.iter().find(|(n, _)| *n == name.as_str()) {
                select = select.filter(column.eq(value.as_str()));
            }
        }

        // One extra row tells whether another page follows.
        let mut rows = select
            .order_by_desc(R::idx_column())
            .limit(query.limit + 1)
            .all(&self.db)
            .await?;

        let next = if rows.len() as u64 > query.limit {
            rows.truncate(query.limit as usize);
            rows.last().map(R::idx)
        } else {
            None
        };

        let items = self.to_dtos(rows).await?;
        Ok(Page { items, next })
    }

    async fn find(&self, id: &Identifier) -> Result<R::Dto, StoreError> {
        let model = Self::live()
            .filter(Self::identify(id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        self.to_dto(model).await
    }

    async fn create(&self, form: R::Form) -> Result<R::Dto, StoreError> {
        let files = R::files(&form);
        let active = R::create(form, NewRow::generate())?;

        let txn = self.db.begin().await?;
        let model = active.insert(&txn).await?;
        if R::ATTACHMENTS
            && let Some(files) = files
        {
            attachment::replace(&txn, R::NAME, R::uid(&model), files).await?;
        }
        txn.commit().await?;

        self.to_dto(model).await
    }

    async fn update(&self, id: &Identifier, form: R::Form) -> Result<R::Dto, StoreError> {
        let files = R::files(&form);

        let txn = self.db.begin().await?;
        let existing = Self::live()
            .filter(Self::identify(id))
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut active = existing.into_active_model();
        R::update(&mut active, form, Utc::now())?;
        let model = active.update(&txn).await?;

        if R::ATTACHMENTS
            && let Some(files) = files
        {
            attachment::replace(&txn, R::NAME, R::uid(&model), files).await?;
        }
        txn.commit().await?;

        self.to_dto(model).await
    }

    async fn delete(&self, targets: &Targets) -> Result<u64, StoreError> {
        self.mark(targets, R::is_use_column(), false.into()).await
    }

    async fn update_status(&self, targets: &Targets, status: &str) -> Result<u64, StoreError> {
        let Some(column) = R::status_column() else {
            return Ok(0);
        };
        self.mark(targets, column, status.to_string().into()).await
    }
}
