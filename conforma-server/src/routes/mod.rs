pub mod admin;
pub mod auth;
pub mod members;
pub mod nonconformities;
pub mod risks;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn from_doc<T: DeserializeOwned>(doc: Value) -> Result<T> {
    Ok(serde_json::from_value(doc)?)
}
