//! The storage seam.
//!
//! Records are JSON documents in named collections. Single-document
//! operations plus `commit`, which applies a guarded multi-document
//! batch atomically: every guard holds and every op applies, or
//! nothing is written.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Equality filter over top-level document fields.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    eq: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.eq.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.eq
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    pub fn is_empty(&self) -> bool {
        self.eq.is_empty()
    }
}

/// A precondition evaluated inside the same critical section as the
/// batch it guards.
#[derive(Debug, Clone)]
pub enum Guard {
    /// No document in `collection` may already hold `value` in `field`.
    Unique {
        collection: String,
        field: String,
        value: Value,
    },
}

impl Guard {
    pub fn unique(
        collection: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Guard::Unique {
            collection: collection.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum WriteOp {
    Insert {
        collection: String,
        id: String,
        value: Value,
    },
    Remove {
        collection: String,
        id: String,
    },
}

/// A guarded multi-document write.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub guards: Vec<Guard>,
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn insert(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        value: Value,
    ) -> Self {
        self.ops.push(WriteOp::Insert {
            collection: collection.into(),
            id: id.into(),
            value,
        });
        self
    }

    pub fn remove(mut self, collection: impl Into<String>, id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Remove {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Document store over named collections.
///
/// Implementations decide durability; the contract is that `insert`
/// fails with Conflict on an existing id, `replace` fails with
/// NotFound on a missing one, and `commit` is all-or-nothing.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert(&self, collection: &str, id: &str, value: Value) -> Result<()>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>>;

    async fn replace(&self, collection: &str, id: &str, value: Value) -> Result<()>;

    async fn remove(&self, collection: &str, id: &str) -> Result<()>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        Ok(self.find(collection, filter).await?.len() as u64)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}
