//! Admin-scoped routes: user management and tenant provisioning.
//!
//! Guarded by `admin_context` (valid session + super-admin flag).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use conforma_core::errors::Error;
use conforma_core::pagination::{PageQuery, Paginated};
use conforma_core::permissions::Role;
use conforma_core::records::{Membership, Subscription, Tenant, User};
use conforma_core::tenant::TenantId;
use conforma_store::{Filter, Guard, Store, WriteBatch};

use crate::bootstrap;
use crate::context::admin_context;
use crate::error::{from_json_rejection, ApiError};
use crate::routes::from_doc;
use crate::state::{collections, AppState};
use crate::validate::{check_valid, is_valid_slug};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    pub super_admin: bool,
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    admin_context(&state, &headers).await?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let user = bootstrap::create_user(
        &state,
        &req.email,
        &req.name,
        &req.password,
        req.super_admin,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": user.sanitized() }))))
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Value>>, ApiError> {
    admin_context(&state, &headers).await?;

    let docs = state
        .store
        .find(collections::USERS, &Filter::new())
        .await?;
    let mut users = docs
        .into_iter()
        .map(from_doc::<User>)
        .collect::<Result<Vec<_>, _>>()?;
    users.sort_by(|a, b| a.email.cmp(&b.email));

    let rows = users.iter().map(User::sanitized).collect();
    Ok(Json(Paginated::from_rows(rows, &page)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[validate(length(min = 2, max = 63))]
    pub slug: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Existing user who becomes the tenant's first admin.
    pub admin_user_id: Uuid,
}

/// POST /admin/tenants
///
/// Tenant, initial admin membership and trial subscription commit as
/// one batch: all three exist afterwards or none do.
pub async fn create_tenant(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    admin_context(&state, &headers).await?;

    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;
    if !is_valid_slug(&req.slug) {
        return Err(Error::validation("Invalid tenant slug")
            .with_details(json!({"slug": ["lowercase letters, digits and hyphens only"]}))
            .into());
    }

    let admin_doc = state
        .store
        .get(collections::USERS, &req.admin_user_id.to_string())
        .await?
        .ok_or_else(|| Error::not_found("Admin user not found").into_anyhow())?;
    let admin: User = from_doc(admin_doc)?;

    let now = Utc::now();
    let tenant = Tenant {
        id: TenantId::new(),
        slug: req.slug.clone(),
        name: req.name.trim().to_string(),
        created_at: now,
    };
    let membership = Membership {
        id: Uuid::new_v4(),
        tenant_id: tenant.id,
        user_id: admin.id,
        role: Role::Admin,
        created_at: now,
    };
    let subscription = Subscription::trial(tenant.id, now);

    let batch = WriteBatch::new()
        .guard(Guard::unique(
            collections::TENANTS,
            "slug",
            tenant.slug.clone(),
        ))
        .insert(
            collections::TENANTS,
            tenant.id.to_string(),
            serde_json::to_value(&tenant)?,
        )
        .insert(
            collections::MEMBERSHIPS,
            membership.id.to_string(),
            serde_json::to_value(&membership)?,
        )
        .insert(
            collections::SUBSCRIPTIONS,
            subscription.id.to_string(),
            serde_json::to_value(&subscription)?,
        );
    state.store.commit(batch).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "tenant": tenant,
                "membership": membership,
                "subscription": subscription,
            }
        })),
    ))
}

/// GET /admin/tenants
pub async fn list_tenants(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Tenant>>, ApiError> {
    admin_context(&state, &headers).await?;

    let docs = state
        .store
        .find(collections::TENANTS, &Filter::new())
        .await?;
    let mut tenants = docs
        .into_iter()
        .map(from_doc::<Tenant>)
        .collect::<Result<Vec<_>, _>>()?;
    tenants.sort_by(|a, b| a.slug.cmp(&b.slug));

    Ok(Json(Paginated::from_rows(tenants, &page)))
}
