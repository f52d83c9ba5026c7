//! Store access: one query per call against the backing relational store.

mod memory;
mod postgres;
mod rest;

pub use memory::MemoryStore;
pub use postgres::{ensure_tables, PgStore};
pub use rest::RestStore;

use crate::error::StoreError;
use crate::schema::{Relation, TableDef};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One row as the store returns it: column name to JSON value.
pub type Row = Map<String, Value>;

/// Which columns of an embedded table to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(&'static [&'static str]),
}

#[derive(Clone, Copy, Debug)]
pub struct Embed {
    pub relation: &'static Relation,
    pub projection: Projection,
}

/// SELECT * FROM table WHERE col = value AND ... with embedded related rows.
#[derive(Clone, Debug)]
pub struct Select {
    pub table: &'static TableDef,
    pub filters: Vec<(&'static str, Value)>,
    pub embeds: Vec<Embed>,
}

impl Select {
    pub fn from(table: &'static TableDef) -> Self {
        Select {
            table,
            filters: Vec::new(),
            embeds: Vec::new(),
        }
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn embed(mut self, relation: &'static Relation, projection: Projection) -> Self {
        self.embeds.push(Embed { relation, projection });
        self
    }
}

#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError>;

    /// Insert one row; returns the inserted rows with store-assigned columns.
    async fn insert(&self, table: &'static TableDef, row: &Row) -> Result<Vec<Row>, StoreError>;

    /// Apply `patch` to the row with primary key `id`. Empty result when no row matched.
    async fn update(&self, table: &'static TableDef, id: i64, patch: &Row) -> Result<Vec<Row>, StoreError>;

    /// Delete the row with primary key `id`. Empty result when no row matched.
    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<Vec<Row>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

/// Keep only the named columns of `row`.
pub(crate) fn project(row: &Row, projection: Projection) -> Row {
    match projection {
        Projection::All => row.clone(),
        Projection::Columns(cols) => cols
            .iter()
            .filter_map(|c| row.get(*c).map(|v| (c.to_string(), v.clone())))
            .collect(),
    }
}
