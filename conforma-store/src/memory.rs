//! In-memory store adapter.
//!
//! One `RwLock` over every collection, so a committed batch is
//! observed either entirely or not at all. Backs the test suite and
//! single-process deployments.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use conforma_core::errors::Error;

use crate::store::{Filter, Guard, Store, WriteBatch, WriteOp};

type Collections = HashMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Default)]
pub struct MemStore {
    collections: RwLock<Collections>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_guard(collections: &Collections, guard: &Guard) -> Result<()> {
        match guard {
            Guard::Unique {
                collection,
                field,
                value,
            } => {
                let taken = collections
                    .get(collection)
                    .map(|docs| docs.values().any(|doc| doc.get(field) == Some(value)))
                    .unwrap_or(false);

                if taken {
                    return Err(Error::conflict(format!(
                        "{collection}.{field} already taken"
                    ))
                    .into_anyhow());
                }
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert(&self, collection: &str, id: &str, value: Value) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.contains_key(id) {
            return Err(Error::conflict(format!("{collection}/{id} already exists")).into_anyhow());
        }
        docs.insert(id.to_string(), value);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let collections = self.collections.read().unwrap();
        let rows = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn replace(&self, collection: &str, id: &str, value: Value) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.get_mut(id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::not_found(format!("{collection}/{id} not found")).into_anyhow()),
        }
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));

        match removed {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("{collection}/{id} not found")).into_anyhow()),
        }
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let mut collections = self.collections.write().unwrap();

        // Validate everything before touching anything.
        for guard in &batch.guards {
            Self::check_guard(&collections, guard)?;
        }
        for op in &batch.ops {
            match op {
                WriteOp::Insert { collection, id, .. } => {
                    let exists = collections
                        .get(collection)
                        .map(|docs| docs.contains_key(id))
                        .unwrap_or(false);
                    if exists {
                        return Err(Error::conflict(format!(
                            "{collection}/{id} already exists"
                        ))
                        .into_anyhow());
                    }
                }
                WriteOp::Remove { collection, id } => {
                    let exists = collections
                        .get(collection)
                        .map(|docs| docs.contains_key(id))
                        .unwrap_or(false);
                    if !exists {
                        return Err(
                            Error::not_found(format!("{collection}/{id} not found")).into_anyhow()
                        );
                    }
                }
            }
        }

        for op in batch.ops {
            match op {
                WriteOp::Insert {
                    collection,
                    id,
                    value,
                } => {
                    collections.entry(collection).or_default().insert(id, value);
                }
                WriteOp::Remove { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conforma_core::errors::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn insert_then_get() {
        let store = MemStore::new();
        store
            .insert("risks", "r1", json!({"title": "supplier delay"}))
            .await
            .unwrap();

        let doc = store.get("risks", "r1").await.unwrap().unwrap();
        assert_eq!(doc["title"], "supplier delay");
        assert!(store.get("risks", "r2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn double_insert_conflicts() {
        let store = MemStore::new();
        store.insert("risks", "r1", json!({})).await.unwrap();
        let err = store.insert("risks", "r1", json!({})).await.unwrap_err();
        assert_eq!(Error::normalize(err).kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn find_filters_on_fields() {
        let store = MemStore::new();
        store
            .insert("ncs", "a", json!({"tenantId": "t1", "status": "open"}))
            .await
            .unwrap();
        store
            .insert("ncs", "b", json!({"tenantId": "t2", "status": "open"}))
            .await
            .unwrap();

        let rows = store
            .find("ncs", &Filter::new().eq("tenantId", "t1"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["tenantId"], "t1");
    }

    #[tokio::test]
    async fn commit_is_all_or_nothing() {
        let store = MemStore::new();
        store
            .insert("tenants", "t1", json!({"slug": "acme"}))
            .await
            .unwrap();

        // Second op collides with an existing id; first op must not land.
        let batch = WriteBatch::new()
            .insert("memberships", "m1", json!({}))
            .insert("tenants", "t1", json!({"slug": "other"}));
        let err = store.commit(batch).await.unwrap_err();
        assert_eq!(Error::normalize(err).kind, ErrorKind::Conflict);
        assert!(store.get("memberships", "m1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unique_guard_blocks_the_whole_batch() {
        let store = MemStore::new();
        store
            .insert("tenants", "t1", json!({"slug": "acme"}))
            .await
            .unwrap();

        let batch = WriteBatch::new()
            .guard(Guard::unique("tenants", "slug", "acme"))
            .insert("tenants", "t2", json!({"slug": "acme"}))
            .insert("subscriptions", "s2", json!({}));
        let err = store.commit(batch).await.unwrap_err();
        assert_eq!(Error::normalize(err).kind, ErrorKind::Conflict);
        assert!(store.get("tenants", "t2").await.unwrap().is_none());
        assert!(store.get("subscriptions", "s2").await.unwrap().is_none());
    }
}
