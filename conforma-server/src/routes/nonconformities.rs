//! Nonconformity (NC) routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use conforma_core::codes::sequential_code;
use conforma_core::errors::Error;
use conforma_core::pagination::{PageQuery, Paginated};
use conforma_core::permissions::{Action, Resource};
use conforma_core::records::{Nonconformity, NonconformityStatus};
use conforma_store::Filter;

use crate::context::request_context;
use crate::error::{from_json_rejection, ApiError};
use crate::state::{collections, AppState};
use crate::validate::check_valid;

const CODE_PREFIX: &str = "NC";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNonconformityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// POST /t/{slug}/nonconformities
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    body: Result<Json<CreateNonconformityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Nonconformity, Action::Create)?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let existing = ctx
        .db
        .count(collections::NONCONFORMITIES, Filter::new())
        .await?;

    let nc = Nonconformity {
        id: Uuid::new_v4(),
        tenant_id: ctx.tenant_id,
        code: sequential_code(CODE_PREFIX, existing),
        title: req.title.trim().to_string(),
        description: req.description,
        status: NonconformityStatus::Open,
        created_by: ctx.user_id,
        created_at: Utc::now(),
        updated_at: None,
    };
    ctx.db
        .insert(collections::NONCONFORMITIES, &nc.id.to_string(), &nc)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": nc }))))
}

/// GET /t/{slug}/nonconformities
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Nonconformity>>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Nonconformity, Action::Read)?;

    let rows: Vec<Nonconformity> = ctx
        .db
        .find(collections::NONCONFORMITIES, Filter::new())
        .await?;
    Ok(Json(Paginated::from_rows(rows, &page)))
}

/// GET /t/{slug}/nonconformities/{id}
pub async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Nonconformity, Action::Read)?;

    let nc: Nonconformity = ctx
        .db
        .get(collections::NONCONFORMITIES, &id)
        .await?
        .ok_or_else(|| Error::not_found("Nonconformity not found").into_anyhow())?;

    Ok(Json(json!({ "data": nc })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatchNonconformityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub status: Option<NonconformityStatus>,
}

/// PATCH /t/{slug}/nonconformities/{id}
pub async fn patch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((slug, id)): Path<(String, String)>,
    body: Result<Json<PatchNonconformityRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Nonconformity, Action::Update)?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let mut nc: Nonconformity = ctx
        .db
        .get(collections::NONCONFORMITIES, &id)
        .await?
        .ok_or_else(|| Error::not_found("Nonconformity not found").into_anyhow())?;

    if let Some(title) = req.title {
        nc.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        nc.description = Some(description);
    }
    if let Some(status) = req.status {
        nc.status = status;
    }
    nc.updated_at = Some(Utc::now());

    ctx.db.replace(collections::NONCONFORMITIES, &id, &nc).await?;

    Ok(Json(json!({ "data": nc })))
}
