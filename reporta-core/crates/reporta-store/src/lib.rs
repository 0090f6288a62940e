//! Reporta storage ports
//!
//! The application talks to a hosted relational database and a hosted
//! object store through the two traits in [`ports`]. Rows are plain JSON
//! objects; typed access lives with the callers.
//!
//! ## Adapters
//! - [`memory`]: in-process tables and objects for development and tests
//! - [`rest`]: PostgREST tables and Storage API buckets over HTTP

pub mod memory;
pub mod ports;
pub mod query;
pub mod rest;

pub use memory::{InMemoryObjectStorage, InMemoryStore};
pub use ports::{ObjectStorage, RelationalStore};
pub use query::{Condition, Filter, Op, Order, Query};
pub use rest::{RestObjectStorage, RestStore};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// One table row.
pub type Row = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("refusing to {action} every row of {table} without a filter")]
    UnfilteredWrite { action: &'static str, table: String },

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Serialize a record into a row.
pub fn to_row<T: Serialize>(record: &T) -> Result<Row> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(row) => Ok(row),
        _ => Err(StoreError::NotAnObject),
    }
}

pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}

pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(from_row).collect()
}
