//! Resource actions shared by every backoffice screen.
//!
//! Each action takes the storage port and the caller's message bundle, so the
//! same code serves every [`Resource`] and every locale. Store failures that
//! have a user-facing meaning (`NotFound`, `Conflict`) are translated here;
//! anything else is logged and propagated as an internal error.

use std::collections::HashMap;

use backoffice_common::pagination::clamp_limit;
use backoffice_common::schema::FormMode;
use backoffice_common::{Affected, Cursor, CursorPage, Envelope, MessageBundle, UserRole};
use serde_json::Value;

use crate::error::AppError;
use crate::models::shared::{ListParams, StatusPayload, TargetPayload};
use crate::resource::Resource;
use crate::store::{Identifier, ListQuery, Store, StoreError, Targets};

const TARGET_FIELDS: &str = "id, ids, uid, uids";

pub async fn list<R, S>(
    store: &S,
    messages: MessageBundle<'_>,
    query: HashMap<String, String>,
) -> Result<CursorPage<R::Dto>, AppError>
where
    R: Resource,
    S: Store<R> + ?Sized,
{
    let params = ListParams::from_query(query)
        .map_err(|e| AppError::validation(messages.text(e.message_key(), &[])))?;

    let after = params
        .cursor
        .as_deref()
        .map(Cursor::decode)
        .transpose()
        .map_err(|_| AppError::validation(messages.text("error.invalid_cursor", &[])))?
        .map(|c| c.idx());

    let limit = clamp_limit(params.limit);
    let query = ListQuery {
        after,
        limit,
        search: params.search,
        visible: params.visible,
        filters: params.filters,
    };

    let page = store
        .list(&query)
        .await
        .map_err(|e| failure::<R>("list", e, messages))?;

    Ok(CursorPage {
        items: page.items,
        next_cursor: page.next.map(|idx| Cursor::new(idx).encode()),
        limit,
    })
}

pub async fn show<R, S>(
    store: &S,
    messages: MessageBundle<'_>,
    segment: &str,
) -> Result<R::Dto, AppError>
where
    R: Resource,
    S: Store<R> + ?Sized,
{
    let id = Identifier::parse(segment);
    store
        .find(&id)
        .await
        .map_err(|e| lookup_failure::<R>("show", &id, e, messages))
}

pub async fn create<R, S>(
    store: &S,
    messages: MessageBundle<'_>,
    role: UserRole,
    body: Value,
) -> Result<Envelope<R::Dto>, AppError>
where
    R: Resource,
    S: Store<R> + ?Sized,
{
    guard_admin_fields::<R>(role, &body)?;
    let form = parse_form::<R>(FormMode::Create, body, messages)?;
    let dto = store
        .create(form)
        .await
        .map_err(|e| failure::<R>("create", e, messages))?;

    Ok(Envelope::success(messages.text("action.created", &[]), dto))
}

pub async fn update<R, S>(
    store: &S,
    messages: MessageBundle<'_>,
    role: UserRole,
    segment: &str,
    body: Value,
) -> Result<Envelope<R::Dto>, AppError>
where
    R: Resource,
    S: Store<R> + ?Sized,
{
    guard_admin_fields::<R>(role, &body)?;
    let id = Identifier::parse(segment);
    let form = parse_form::<R>(FormMode::Update, body, messages)?;
    let dto = store
        .update(&id, form)
        .await
        .map_err(|e| lookup_failure::<R>("update", &id, e, messages))?;

    Ok(Envelope::success(messages.text("action.updated", &[]), dto))
}

/// Soft-delete every addressed row.
pub async fn delete<R, S>(
    store: &S,
    messages: MessageBundle<'_>,
    payload: &TargetPayload,
) -> Result<Envelope<Affected>, AppError>
where
    R: Resource,
    S: Store<R> + ?Sized,
{
    let targets = require_targets(payload, messages)?;
    let affected = store
        .delete(&targets)
        .await
        .map_err(|e| failure::<R>("delete", e, messages))?;

    let count = affected.to_string();
    Ok(Envelope::success(
        messages.text("action.deleted", &[("count", &count)]),
        Affected { affected },
    ))
}

pub async fn update_status<R, S>(
    store: &S,
    messages: MessageBundle<'_>,
    payload: &StatusPayload,
) -> Result<Envelope<Affected>, AppError>
where
    R: Resource,
    S: Store<R> + ?Sized,
{
    let targets = require_targets(&payload.targets, messages)?;

    let status = payload
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing_fields("status", messages))?;

    if !R::STATUSES.contains(&status) {
        return Err(AppError::validation(
            messages.text("error.invalid_status", &[("status", status)]),
        ));
    }

    let affected = store
        .update_status(&targets, status)
        .await
        .map_err(|e| failure::<R>("update_status", e, messages))?;

    let count = affected.to_string();
    Ok(Envelope::success(
        messages.text("action.status_updated", &[("count", &count)]),
        Affected { affected },
    ))
}

/// Role and status columns move only through an admin, whatever the route.
fn guard_admin_fields<R: Resource>(role: UserRole, body: &Value) -> Result<(), AppError> {
    if role == UserRole::Admin {
        return Ok(());
    }

    let touched = R::ADMIN_FIELDS.iter().any(|field| match body.get(*field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    });
    if touched {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}

/// Validate the raw body, then read it into the resource's form type.
fn parse_form<R: Resource>(
    mode: FormMode,
    mut body: Value,
    messages: MessageBundle<'_>,
) -> Result<R::Form, AppError> {
    let schema = R::schema(mode);

    let errors = schema.validate(&body, messages);
    if !errors.is_empty() {
        return Err(AppError::Validation {
            message: messages.text("error.validation", &[]),
            errors,
        });
    }

    schema.normalize(&mut body);
    serde_json::from_value(body).map_err(|e| {
        let detail = e.to_string();
        AppError::validation(messages.text("error.invalid_body", &[("detail", &detail)]))
    })
}

fn require_targets(
    payload: &TargetPayload,
    messages: MessageBundle<'_>,
) -> Result<Targets, AppError> {
    let targets = payload.targets();
    if targets.is_empty() {
        return Err(missing_fields(TARGET_FIELDS, messages));
    }
    Ok(targets)
}

fn missing_fields(fields: &str, messages: MessageBundle<'_>) -> AppError {
    AppError::MissingFields(messages.text("error.missing_fields", &[("fields", fields)]))
}

fn lookup_failure<R: Resource>(
    action: &'static str,
    id: &Identifier,
    err: StoreError,
    messages: MessageBundle<'_>,
) -> AppError {
    match err {
        StoreError::NotFound => {
            let label = messages.resource_label(R::NAME);
            let id = id.to_string();
            AppError::NotFound(messages.text(
                "error.not_found",
                &[("resource", &label), ("id", &id)],
            ))
        }
        other => failure::<R>(action, other, messages),
    }
}

fn failure<R: Resource>(
    action: &'static str,
    err: StoreError,
    messages: MessageBundle<'_>,
) -> AppError {
    match err {
        StoreError::Conflict(detail) => {
            tracing::debug!(resource = R::NAME, action, %detail, "unique constraint violated");
            AppError::Conflict(messages.text("error.conflict", &[]))
        }
        other => {
            tracing::error!(resource = R::NAME, action, error = %other, "store call failed");
            AppError::from(other)
        }
    }
}
