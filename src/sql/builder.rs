//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from the static table model.

use crate::schema::{EmbedDirection, TableDef};
use crate::store::{Projection, Row, Select};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from the table model).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }

    /// Placeholder with a cast to the column's declared type, so text dates bind correctly.
    fn placeholder(&mut self, table: &TableDef, column: &str, v: Value) -> String {
        let n = self.push_param(v);
        match table.column(column) {
            Some(c) => format!("${}::{}", n, c.pg_type),
            None => format!("${}", n),
        }
    }
}

fn projection_list(projection: Projection) -> String {
    match projection {
        Projection::All => "*".to_string(),
        Projection::Columns(cols) => cols.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", "),
    }
}

/// SELECT main.* plus one scalar subquery per embed (json_agg for to_many, row_to_json for to_one).
pub fn select(schema: &str, query: &Select) -> QueryBuf {
    const MAIN_ALIAS: &str = "main";
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, query.table.name);

    let mut select_parts = vec![format!("{}.*", MAIN_ALIAS)];
    for embed in &query.embeds {
        let rel = embed.relation;
        let rel_table = qualified_table(schema, rel.related.name);
        let sub_from = format!(
            "{} WHERE {} = {}.{}",
            rel_table,
            quoted(rel.their_key),
            MAIN_ALIAS,
            quoted(rel.our_key)
        );
        let cols = projection_list(embed.projection);
        let subquery = match rel.direction {
            EmbedDirection::ToOne => format!("(SELECT row_to_json(sub) FROM (SELECT {} FROM {}) sub)", cols, sub_from),
            EmbedDirection::ToMany => format!(
                "(SELECT COALESCE(json_agg(row_to_json(sub)), '[]'::json) FROM (SELECT {} FROM {}) sub)",
                cols, sub_from
            ),
        };
        select_parts.push(format!("{} AS {}", subquery, quoted(rel.name)));
    }

    let mut where_parts = Vec::new();
    for (col, val) in &query.filters {
        let ph = q.placeholder(query.table, col, val.clone());
        where_parts.push(format!("{}.{} = {}", MAIN_ALIAS, quoted(col), ph));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };

    q.sql = format!(
        "SELECT {} FROM {} {}{}",
        select_parts.join(", "),
        table,
        MAIN_ALIAS,
        where_clause
    );
    q
}

/// INSERT the given columns; the primary key and omitted columns take their DB defaults.
pub fn insert(schema: &str, table: &TableDef, row: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in table.columns {
        if c.name == table.pk {
            continue;
        }
        let Some(val) = row.get(c.name) else { continue };
        placeholders.push(q.placeholder(table, c.name, val.clone()));
        cols.push(quoted(c.name));
    }
    let target = qualified_table(schema, table.name);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING *", target)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            target,
            cols.join(", "),
            placeholders.join(", ")
        )
    };
    q
}

/// UPDATE by id: SET only model columns present in the patch. An empty patch degrades to a SELECT by id.
pub fn update(schema: &str, table: &TableDef, id: i64, patch: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let target = qualified_table(schema, table.name);
    let mut sets = Vec::new();
    for c in table.columns {
        if c.name == table.pk {
            continue;
        }
        let Some(val) = patch.get(c.name) else { continue };
        let ph = q.placeholder(table, c.name, val.clone());
        sets.push(format!("{} = {}", quoted(c.name), ph));
    }
    let id_ph = q.placeholder(table, table.pk, Value::from(id));
    q.sql = if sets.is_empty() {
        format!("SELECT * FROM {} WHERE {} = {}", target, quoted(table.pk), id_ph)
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = {} RETURNING *",
            target,
            sets.join(", "),
            quoted(table.pk),
            id_ph
        )
    };
    q
}

/// DELETE by id.
pub fn delete(schema: &str, table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let target = qualified_table(schema, table.name);
    let id_ph = q.placeholder(table, table.pk, Value::from(id));
    q.sql = format!("DELETE FROM {} WHERE {} = {} RETURNING *", target, quoted(table.pk), id_ph);
    q
}
