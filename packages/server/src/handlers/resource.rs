//! HTTP entry points for every resource. Each handler checks the caller's
//! role, builds the resource's store and hands off to [`crate::actions`].

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use backoffice_common::{Affected, CursorPage, Envelope};
use serde_json::Value;
use tracing::instrument;

use crate::actions;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::locale::RequestLocale;
use crate::models::shared::{StatusPayload, TargetPayload};
use crate::resource::Resource;
use crate::state::AppState;
use crate::store::SeaStore;

fn store<R: Resource>(state: &AppState) -> SeaStore<R> {
    SeaStore::new(state.db.clone())
}

#[instrument(skip_all, fields(resource = R::NAME, user = %auth_user.uid))]
pub async fn list<R: Resource>(
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<CursorPage<R::Dto>>, AppError> {
    auth_user.require_staff()?;

    let page = actions::list::<R, _>(&store::<R>(&state), state.messages(locale), query).await?;
    Ok(Json(page))
}

#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn show<R: Resource>(
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R::Dto>, AppError> {
    auth_user.require_staff()?;

    let dto = actions::show::<R, _>(&store::<R>(&state), state.messages(locale), &id).await?;
    Ok(Json(dto))
}

#[instrument(skip_all, fields(resource = R::NAME, user = %auth_user.uid))]
pub async fn create<R: Resource>(
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_staff()?;

    let envelope = actions::create::<R, _>(
        &store::<R>(&state),
        state.messages(locale),
        auth_user.role,
        body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(envelope)))
}

#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn update<R: Resource>(
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<Envelope<R::Dto>>, AppError> {
    auth_user.require_staff()?;

    let envelope = actions::update::<R, _>(
        &store::<R>(&state),
        state.messages(locale),
        auth_user.role,
        &id,
        body,
    )
    .await?;
    Ok(Json(envelope))
}

#[instrument(skip_all, fields(resource = R::NAME, user = %auth_user.uid))]
pub async fn delete<R: Resource>(
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    AppJson(payload): AppJson<TargetPayload>,
) -> Result<Json<Envelope<Affected>>, AppError> {
    auth_user.require_admin()?;

    let envelope =
        actions::delete::<R, _>(&store::<R>(&state), state.messages(locale), &payload).await?;
    Ok(Json(envelope))
}

#[instrument(skip_all, fields(resource = R::NAME, user = %auth_user.uid))]
pub async fn update_status<R: Resource>(
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StatusPayload>,
) -> Result<Json<Envelope<Affected>>, AppError> {
    auth_user.require_admin()?;

    let envelope =
        actions::update_status::<R, _>(&store::<R>(&state), state.messages(locale), &payload)
            .await?;
    Ok(Json(envelope))
}
