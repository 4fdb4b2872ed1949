//! Tenant membership management.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use conforma_core::errors::Error;
use conforma_core::pagination::{PageQuery, Paginated};
use conforma_core::permissions::{Action, Resource, Role};
use conforma_core::records::{Membership, Subscription, User};
use conforma_store::{Filter, Store};

use crate::context::request_context;
use crate::error::{from_json_rejection, ApiError};
use crate::routes::from_doc;
use crate::state::{collections, AppState};
use crate::validate::check_valid;

/// GET /t/{slug}/members
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Membership>>, ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Member, Action::Read)?;

    let members: Vec<Membership> = ctx.db.find(collections::MEMBERSHIPS, Filter::new()).await?;
    Ok(Json(Paginated::from_rows(members, &page)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

/// POST /t/{slug}/members
///
/// Fails PlanLimit when the subscription's member cap is reached.
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let ctx = request_context(&state, &headers, &slug).await?;
    ctx.require(Resource::Member, Action::Manage)?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let rows = state
        .store
        .find(
            collections::USERS,
            &Filter::new().eq("email", req.email.to_lowercase()),
        )
        .await?;
    let user: User = match rows.into_iter().next() {
        Some(doc) => from_doc(doc)?,
        None => return Err(Error::not_found("User not found").into()),
    };

    let existing: Vec<Membership> = ctx
        .db
        .find(
            collections::MEMBERSHIPS,
            Filter::new().eq("userId", user.id.to_string()),
        )
        .await?;
    if !existing.is_empty() {
        return Err(Error::conflict("Already a member of this tenant").into());
    }

    let subscriptions: Vec<Subscription> = ctx
        .db
        .find(collections::SUBSCRIPTIONS, Filter::new())
        .await?;
    let subscription = subscriptions
        .into_iter()
        .next()
        .ok_or_else(|| Error::general("Tenant has no subscription").into_anyhow())?;

    if let Some(limit) = subscription.plan.member_limit() {
        let current = ctx.db.count(collections::MEMBERSHIPS, Filter::new()).await?;
        if current >= limit {
            return Err(Error::plan_limit(format!(
                "Current plan allows at most {limit} members"
            ))
            .with_details(json!({"limit": limit}))
            .into());
        }
    }

    let membership = Membership {
        id: Uuid::new_v4(),
        tenant_id: ctx.tenant_id,
        user_id: user.id,
        role: req.role,
        created_at: Utc::now(),
    };
    ctx.db
        .insert(
            collections::MEMBERSHIPS,
            &membership.id.to_string(),
            &membership,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": membership }))))
}
