//! Tenant-scoped data access handle.
//!
//! Handed out by the request-context resolver once membership is
//! confirmed. Every write is stamped with the tenant id and every
//! read is filtered by it, so a handler holding a `ScopedDb` cannot
//! reach another tenant's rows.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use conforma_core::errors::Error;
use conforma_core::tenant::TenantId;

use crate::store::{Filter, Store, WriteBatch};

pub const TENANT_FIELD: &str = "tenantId";

#[derive(Clone)]
pub struct ScopedDb {
    store: Arc<dyn Store>,
    tenant: TenantId,
}

impl ScopedDb {
    pub fn new(store: Arc<dyn Store>, tenant: TenantId) -> Self {
        Self { store, tenant }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant
    }

    fn tenant_value(&self) -> Value {
        Value::String(self.tenant.to_string())
    }

    fn scope(&self, filter: Filter) -> Filter {
        filter.eq(TENANT_FIELD, self.tenant_value())
    }

    fn stamp<T: Serialize>(&self, record: &T) -> Result<Value> {
        let mut value = serde_json::to_value(record)?;
        match value.as_object_mut() {
            Some(map) => {
                map.insert(TENANT_FIELD.to_string(), self.tenant_value());
            }
            None => {
                return Err(
                    Error::general("tenant-scoped records must be JSON objects").into_anyhow()
                )
            }
        }
        Ok(value)
    }

    pub async fn insert<T: Serialize>(&self, collection: &str, id: &str, record: &T) -> Result<()> {
        let value = self.stamp(record)?;
        self.store.insert(collection, id, value).await
    }

    /// Fetch one record; rows belonging to other tenants read as absent.
    pub async fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let doc = self.store.get(collection, id).await?;
        match doc {
            Some(doc) if doc.get(TENANT_FIELD) == Some(&self.tenant_value()) => {
                Ok(Some(serde_json::from_value(doc)?))
            }
            _ => Ok(None),
        }
    }

    /// Find records, ordered by `createdAt` then `code` so paginated
    /// listings are stable.
    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Vec<T>> {
        let mut docs = self.store.find(collection, &self.scope(filter)).await?;
        docs.sort_by(|a, b| {
            // Parse timestamps rather than comparing the raw strings;
            // RFC 3339 fractional-second precision varies.
            let key = |doc: &Value| {
                let created: Option<DateTime<Utc>> = doc
                    .get("createdAt")
                    .and_then(Value::as_str)
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|t| t.with_timezone(&Utc));
                let code = doc
                    .get("code")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (created, code)
            };
            key(a).cmp(&key(b))
        });

        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub async fn replace<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        record: &T,
    ) -> Result<()> {
        // Verify ownership before overwriting.
        let existing: Option<Value> = self.get(collection, id).await?;
        if existing.is_none() {
            return Err(Error::not_found(format!("{collection}/{id} not found")).into_anyhow());
        }
        let value = self.stamp(record)?;
        self.store.replace(collection, id, value).await
    }

    pub async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        let existing: Option<Value> = self.get(collection, id).await?;
        if existing.is_none() {
            return Err(Error::not_found(format!("{collection}/{id} not found")).into_anyhow());
        }
        self.store.remove(collection, id).await
    }

    pub async fn count(&self, collection: &str, filter: Filter) -> Result<u64> {
        self.store.count(collection, &self.scope(filter)).await
    }

    pub async fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.store.commit(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemStore;
    use serde_json::json;

    fn scoped() -> (Arc<MemStore>, ScopedDb, ScopedDb) {
        let store = Arc::new(MemStore::new());
        let a = ScopedDb::new(store.clone(), TenantId::new());
        let b = ScopedDb::new(store.clone(), TenantId::new());
        (store, a, b)
    }

    #[tokio::test]
    async fn writes_are_stamped_with_the_tenant() {
        let (store, a, _) = scoped();
        a.insert("risks", "r1", &json!({"title": "x"})).await.unwrap();

        let raw = store.get("risks", "r1").await.unwrap().unwrap();
        assert_eq!(raw[TENANT_FIELD], a.tenant_id().to_string());
    }

    #[tokio::test]
    async fn reads_do_not_cross_tenants() {
        let (_, a, b) = scoped();
        a.insert("risks", "r1", &json!({"title": "x"})).await.unwrap();

        let from_b: Option<Value> = b.get("risks", "r1").await.unwrap();
        assert!(from_b.is_none());

        let rows: Vec<Value> = b.find("risks", Filter::new()).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(a.count("risks", Filter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_refuses_foreign_rows() {
        let (store, a, b) = scoped();
        a.insert("risks", "r1", &json!({"title": "x"})).await.unwrap();

        assert!(b.remove("risks", "r1").await.is_err());
        assert!(store.get("risks", "r1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn find_orders_by_created_at() {
        let (_, a, _) = scoped();
        a.insert("ncs", "b", &json!({"createdAt": "2026-02-01T00:00:00Z", "code": "NC-0002"}))
            .await
            .unwrap();
        a.insert("ncs", "a", &json!({"createdAt": "2026-01-01T00:00:00Z", "code": "NC-0001"}))
            .await
            .unwrap();

        let rows: Vec<Value> = a.find("ncs", Filter::new()).await.unwrap();
        assert_eq!(rows[0]["code"], "NC-0001");
        assert_eq!(rows[1]["code"], "NC-0002");
    }

    #[tokio::test]
    async fn find_orders_by_parsed_time_not_string_shape() {
        let (_, a, _) = scoped();
        // As strings, ".1Z" sorts after ".15Z"; as timestamps 0.1s < 0.15s.
        a.insert(
            "ncs",
            "b",
            &json!({"createdAt": "2026-01-01T00:00:00.15Z", "code": "NC-0002"}),
        )
        .await
        .unwrap();
        a.insert(
            "ncs",
            "a",
            &json!({"createdAt": "2026-01-01T00:00:00.1Z", "code": "NC-0001"}),
        )
        .await
        .unwrap();

        let rows: Vec<Value> = a.find("ncs", Filter::new()).await.unwrap();
        assert_eq!(rows[0]["code"], "NC-0001");
        assert_eq!(rows[1]["code"], "NC-0002");
    }
}
