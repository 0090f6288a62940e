//! Outbound ports
//!
//! Interfaces the hosted backend adapters implement.

use async_trait::async_trait;

use crate::query::{Filter, Query};
use crate::{Result, Row};

/// Relational store port (`areas`, `area_fields`, `area_submissions`, ...).
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Rows of `table` matching the query, in the query's order
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>>;

    /// Number of rows of `table` matching `filter`
    async fn count(&self, table: &str, filter: &Filter) -> Result<u64>;

    /// Insert `record`, returning the stored row with generated columns
    async fn insert(&self, table: &str, record: Row) -> Result<Row>;

    /// Apply `patch` to every matching row, returning the updated rows
    async fn update(&self, table: &str, patch: Row, filter: &Filter) -> Result<Vec<Row>>;

    /// Delete every matching row, returning how many were removed
    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64>;
}

/// Object storage port for uploaded files.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path`, returning its public URL
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    /// Public URL of `path`, whether or not it exists
    fn public_url(&self, path: &str) -> String;

    /// Remove `path`; false when there was nothing to remove
    async fn delete(&self, path: &str) -> Result<bool>;
}
