//! In-memory adapters for development and testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::ports::{ObjectStorage, RelationalStore};
use crate::query::{Filter, Query};
use crate::{Result, Row, StoreError};

#[derive(Default)]
struct Table {
    rows: Vec<Row>,
    next_id: i64,
}

/// In-memory relational store. Inserted rows without an `id` get the next
/// value of a per-table sequence.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows as-is, advancing the id sequence past any seeded id.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        let mut tables = self.tables.write();
        let table = tables.entry(table.to_string()).or_default();
        for row in rows {
            if let Some(id) = row.get("id").and_then(Value::as_i64) {
                table.next_id = table.next_id.max(id);
            }
            table.rows.push(row);
        }
    }

    /// Make every operation fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RelationalStore for InMemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        self.check_available()?;
        let tables = self.tables.read();
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|t| t.rows.iter().filter(|r| query.filter.matches(r)).cloned().collect())
            .unwrap_or_default();
        query.sort(&mut rows);
        let rows = rows.into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => rows.take(limit).collect(),
            None => rows.collect(),
        })
    }

    async fn count(&self, table: &str, filter: &Filter) -> Result<u64> {
        self.check_available()?;
        let tables = self.tables.read();
        Ok(tables
            .get(table)
            .map(|t| t.rows.iter().filter(|r| filter.matches(r)).count() as u64)
            .unwrap_or(0))
    }

    async fn insert(&self, table: &str, mut record: Row) -> Result<Row> {
        self.check_available()?;
        let mut tables = self.tables.write();
        let table = tables.entry(table.to_string()).or_default();
        match record.get("id").and_then(Value::as_i64) {
            Some(id) => table.next_id = table.next_id.max(id),
            None => {
                table.next_id += 1;
                record.insert("id".into(), Value::from(table.next_id));
            }
        }
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, patch: Row, filter: &Filter) -> Result<Vec<Row>> {
        self.check_available()?;
        if filter.is_empty() {
            return Err(StoreError::UnfilteredWrite { action: "update", table: table.to_string() });
        }
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let mut updated = Vec::new();
        for row in table.rows.iter_mut().filter(|r| filter.matches(r)) {
            for (column, value) in &patch {
                row.insert(column.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64> {
        self.check_available()?;
        if filter.is_empty() {
            return Err(StoreError::UnfilteredWrite { action: "delete", table: table.to_string() });
        }
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = table.rows.len();
        table.rows.retain(|r| !filter.matches(r));
        Ok((before - table.rows.len()) as u64)
    }
}

/// In-memory object storage.
pub struct InMemoryObjectStorage {
    public_base: String,
    objects: RwLock<HashMap<String, (Vec<u8>, String)>>,
    unavailable: AtomicBool,
}

impl InMemoryObjectStorage {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Stored bytes and content type of `path`.
    pub fn get(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.objects.read().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("memory://uploads")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory storage switched off".into()));
        }
        self.objects
            .write()
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        Ok(self.objects.write().remove(path).is_some())
    }
}
