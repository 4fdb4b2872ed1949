//! Domain record types.
//!
//! Stored as JSON documents; every tenant-scoped record carries a
//! `tenantId` field stamped and filtered by the scoped handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::Role;
use crate::risk::RiskLevel;
use crate::tenant::TenantId;

/// An isolated customer organization. Global collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    /// URL-facing identifier, unique across all tenants.
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A person with a login. Global collection; tenant access goes
/// through memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    /// Grants access to admin-scoped routes only, never to tenant
    /// data the user is not a member of.
    #[serde(default)]
    pub super_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Client-safe rendering with the password hash stripped.
    pub fn sanitized(&self) -> serde_json::Value {
        let mut v = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = v.as_object_mut() {
            map.remove("passwordHash");
        }
        v
    }
}

/// Links a user to a tenant with a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Standard,
    Premium,
}

impl Plan {
    /// Maximum member count, `None` meaning unlimited.
    pub fn member_limit(&self) -> Option<u64> {
        match self {
            Plan::Trial => Some(5),
            Plan::Standard => Some(25),
            Plan::Premium => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    Canceled,
}

/// One per tenant, created with the tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
}

impl Subscription {
    pub fn trial(tenant_id: TenantId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            plan: Plan::Trial,
            status: SubscriptionStatus::Trialing,
            started_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskStatus {
    Open,
    Mitigated,
    Accepted,
    Closed,
}

/// A risk register entry. Level is always derived server-side from
/// probability x impact, never accepted from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub probability: u8,
    pub impact: u8,
    pub level: RiskLevel,
    pub status: RiskStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NonconformityStatus {
    Open,
    InProgress,
    Closed,
}

/// A nonconformity (NC) record in the quality-management domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nonconformity {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: NonconformityStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_user_has_no_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "q@example.com".into(),
            name: "Q".into(),
            password_hash: "$2b$10$abc".into(),
            super_admin: false,
            created_at: Utc::now(),
        };
        let v = user.sanitized();
        assert!(v.get("passwordHash").is_none());
        assert_eq!(v["email"], "q@example.com");
    }

    #[test]
    fn tenant_scoped_records_serialize_tenant_id() {
        let sub = Subscription::trial(TenantId::new(), Utc::now());
        let v = serde_json::to_value(&sub).unwrap();
        assert!(v.get("tenantId").is_some());
        assert_eq!(v["plan"], "trial");
        assert_eq!(v["status"], "trialing");
    }

    #[test]
    fn plan_limits() {
        assert_eq!(Plan::Trial.member_limit(), Some(5));
        assert_eq!(Plan::Standard.member_limit(), Some(25));
        assert_eq!(Plan::Premium.member_limit(), None);
    }
}
