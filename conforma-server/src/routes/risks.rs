//! Risk register routes.
//!
//! The risk level is always derived server-side from
//! probability x impact; clients cannot set it.

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
use conforma_core::records::{Risk, RiskStatus};
use conforma_core::risk::risk_level;
use conforma_store::Filter;

use crate::context::request_context;
use crate::error::{from_json_rejection, ApiError};
use crate::state::{collections, AppState};
use crate::validate::check_valid;

const CODE_PREFIX: &str = "RSK";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRiskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub probability: u8,
    #[validate(range(min = 1, max = 5))]
    pub impact: u8,
}

/// POST /t/{slug}/risks
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    body: Result<Json<CreateRiskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Risk, Action::Create)?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let existing = ctx.db.count(collections::RISKS, Filter::new()).await?;

    let risk = Risk {
        id: Uuid::new_v4(),
        tenant_id: ctx.tenant_id,
        code: sequential_code(CODE_PREFIX, existing),
        title: req.title.trim().to_string(),
        description: req.description,
        probability: req.probability,
        impact: req.impact,
        level: risk_level(req.probability, req.impact),
        status: RiskStatus::Open,
        created_by: ctx.user_id,
        created_at: Utc::now(),
        updated_at: None,
    };
    ctx.db
        .insert(collections::RISKS, &risk.id.to_string(), &risk)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": risk }))))
}

/// GET /t/{slug}/risks
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Risk>>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Risk, Action::Read)?;

    let risks: Vec<Risk> = ctx.db.find(collections::RISKS, Filter::new()).await?;
    Ok(Json(Paginated::from_rows(risks, &page)))
}

/// GET /t/{slug}/risks/{id}
pub async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Risk, Action::Read)?;

    let risk: Risk = ctx
        .db
        .get(collections::RISKS, &id)
        .await?
        .ok_or_else(|| Error::not_found("Risk not found").into_anyhow())?;

    Ok(Json(json!({ "data": risk })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatchRiskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub probability: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub impact: Option<u8>,
    pub status: Option<RiskStatus>,
}

/// PATCH /t/{slug}/risks/{id}
///
/// Changing probability or impact recomputes the level.
pub async fn patch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((slug, id)): Path<(String, String)>,
    body: Result<Json<PatchRiskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Risk, Action::Update)?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let mut risk: Risk = ctx
        .db
        .get(collections::RISKS, &id)
        .await?
        .ok_or_else(|| Error::not_found("Risk not found").into_anyhow())?;

    if let Some(title) = req.title {
        risk.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        risk.description = Some(description);
    }
    if let Some(probability) = req.probability {
        risk.probability = probability;
    }
    if let Some(impact) = req.impact {
        risk.impact = impact;
    }
    if let Some(status) = req.status {
        risk.status = status;
    }
    risk.level = risk_level(risk.probability, risk.impact);
    risk.updated_at = Some(Utc::now());

    ctx.db.replace(collections::RISKS, &id, &risk).await?;

    Ok(Json(json!({ "data": risk })))
}
