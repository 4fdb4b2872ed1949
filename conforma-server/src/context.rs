//! The tenant-scoped authorization gate.
//!
//! `request_context` is the single entry point tenant routes use to
//! turn an incoming request into something safe to act on: a valid
//! session, a confirmed membership, and a data handle that cannot
//! leave the tenant.

use axum::http::HeaderMap;

use anyhow::Result;
use uuid::Uuid;

use conforma_auth::bearer_token;
use conforma_core::bail_error;
use conforma_core::errors::Error;
use conforma_core::permissions::{require_permission, Action, Resource, Role};
use conforma_core::records::{Membership, Tenant, User};
use conforma_core::tenant::{TenantContext, TenantId};
use conforma_store::{Filter, ScopedDb, Store};

use crate::state::{collections, AppState};

/// Everything a tenant-scoped handler needs. Holding one is proof
/// that the session was valid and the user is a member of the tenant.
pub struct RequestContext {
    pub tenant_id: TenantId,
    pub user_id: Uuid,
    pub role: Role,
    pub db: ScopedDb,
}

impl RequestContext {
    /// Consult the static permission table for this context's role.
    pub fn require(&self, resource: Resource, action: Action) -> Result<()> {
        let ctx = TenantContext::new(self.tenant_id, self.user_id, self.role);
        require_permission(&ctx, resource, action)
    }
}

/// Resolve the acting user from the bearer token, or 401.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| Error::not_authenticated("No access token").into_anyhow())?;

    let claims = state.tokens.verify(&token)?;

    let doc = state
        .store
        .get(collections::USERS, &claims.sub.to_string())
        .await?
        .ok_or_else(|| Error::not_authenticated("User no longer exists").into_anyhow())?;

    Ok(serde_json::from_value(doc)?)
}

/// Resolve a tenant by its URL slug.
pub async fn tenant_by_slug(state: &AppState, slug: &str) -> Result<Option<Tenant>> {
    let rows = state
        .store
        .find(collections::TENANTS, &Filter::new().eq("slug", slug))
        .await?;
    match rows.into_iter().next() {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

/// The gate for `/t/{slug}/...` routes.
///
/// Fails NotAuthenticated without a valid session, and NotFound when
/// the slug is unknown or the user is not a member - a non-member
/// cannot learn whether the tenant exists.
pub async fn request_context(
    state: &AppState,
    headers: &HeaderMap,
    slug: &str,
) -> Result<RequestContext> {
    let user = authenticate(state, headers).await?;

    let tenant = tenant_by_slug(state, slug)
        .await?
        .ok_or_else(|| Error::not_found("Tenant not found").into_anyhow())?;

    let rows = state
        .store
        .find(
            collections::MEMBERSHIPS,
            &Filter::new()
                .eq("tenantId", tenant.id.to_string())
                .eq("userId", user.id.to_string()),
        )
        .await?;

    // Membership, not the global flag, is what grants tenant access.
    let Some(doc) = rows.into_iter().next() else {
        bail_error!(not_found, "Tenant not found");
    };
    let membership: Membership = serde_json::from_value(doc)?;

    Ok(RequestContext {
        tenant_id: tenant.id,
        user_id: user.id,
        role: membership.role,
        db: ScopedDb::new(state.store.clone(), tenant.id),
    })
}

/// The gate for `/admin/...` routes: valid session + super-admin flag.
pub async fn admin_context(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let user = authenticate(state, headers).await?;
    if !user.super_admin {
        bail_error!(forbidden, "Super-admin access required");
    }
    Ok(user)
}
