//! In-process store: auto-increment ids and restrictive foreign keys, same row shapes as the hosted store.

use super::{project, Row, Select, TableStore};
use crate::error::StoreError;
use crate::schema::{EmbedDirection, ForeignKey, TableDef, FOREIGN_KEYS, TABLES};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Row>,
}

pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
    foreign_keys: &'static [ForeignKey],
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let tables = TABLES.iter().map(|t| (t.name, Table::default())).collect();
        MemoryStore {
            tables: RwLock::new(tables),
            foreign_keys: FOREIGN_KEYS,
        }
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Unknown("memory store lock poisoned".into())
    }
}

fn same_key(a: &Value, b: &Value) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn fk_name(fk: &ForeignKey) -> String {
    format!("{}_{}_fkey", fk.table.name, fk.column)
}

fn table_mut<'a>(
    tables: &'a mut HashMap<&'static str, Table>,
    def: &TableDef,
) -> Result<&'a mut Table, StoreError> {
    tables
        .get_mut(def.name)
        .ok_or_else(|| StoreError::Unknown(format!("relation \"{}\" does not exist", def.name)))
}

impl MemoryStore {
    /// Every FK column of `table` present in `row` must reference an existing row.
    fn check_references(
        &self,
        tables: &HashMap<&'static str, Table>,
        table: &TableDef,
        row: &Row,
    ) -> Result<(), StoreError> {
        for fk in self.foreign_keys.iter().filter(|fk| fk.table.name == table.name) {
            let Some(value) = row.get(fk.column).filter(|v| !v.is_null()) else {
                continue;
            };
            let exists = value
                .as_i64()
                .and_then(|id| tables.get(fk.references.name).map(|t| t.rows.contains_key(&id)))
                .unwrap_or(false);
            if !exists {
                return Err(StoreError::Conflict(format!(
                    "insert or update on table \"{}\" violates foreign key constraint \"{}\"",
                    table.name,
                    fk_name(fk)
                )));
            }
        }
        Ok(())
    }

    fn check_not_null(table: &TableDef, row: &Row) -> Result<(), StoreError> {
        for c in table.columns.iter().filter(|c| !c.nullable && c.name != table.pk) {
            if row.get(c.name).map_or(true, Value::is_null) {
                return Err(StoreError::Unknown(format!(
                    "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                    c.name, table.name
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.read().map_err(Self::poisoned)?;
        let Some(main) = tables.get(query.table.name) else {
            return Err(StoreError::Unknown(format!("relation \"{}\" does not exist", query.table.name)));
        };
        let mut out = Vec::new();
        for row in main.rows.values() {
            let matches = query
                .filters
                .iter()
                .all(|(col, val)| row.get(*col).map_or(false, |v| same_key(v, val)));
            if !matches {
                continue;
            }
            let mut row = row.clone();
            for embed in &query.embeds {
                let rel = embed.relation;
                let key = row.get(rel.our_key).cloned().unwrap_or(Value::Null);
                let related = tables.get(rel.related.name).map(|t| {
                    t.rows
                        .values()
                        .filter(|r| !key.is_null() && r.get(rel.their_key).map_or(false, |v| same_key(v, &key)))
                        .map(|r| Value::Object(project(r, embed.projection)))
                        .collect::<Vec<_>>()
                });
                let related = related.unwrap_or_default();
                let value = match rel.direction {
                    EmbedDirection::ToMany => Value::Array(related),
                    EmbedDirection::ToOne => related.into_iter().next().unwrap_or(Value::Null),
                };
                row.insert(rel.name.to_string(), value);
            }
            out.push(row);
        }
        Ok(out)
    }

    async fn insert(&self, table: &'static TableDef, row: &Row) -> Result<Vec<Row>, StoreError> {
        let mut tables = self.tables.write().map_err(Self::poisoned)?;
        Self::check_not_null(table, row)?;
        self.check_references(&tables, table, row)?;
        let t = table_mut(&mut tables, table)?;
        t.next_id += 1;
        let id = t.next_id;
        let mut stored = row.clone();
        stored.insert(table.pk.to_string(), Value::from(id));
        t.rows.insert(id, stored.clone());
        Ok(vec![stored])
    }

    async fn update(&self, table: &'static TableDef, id: i64, patch: &Row) -> Result<Vec<Row>, StoreError> {
        let mut tables = self.tables.write().map_err(Self::poisoned)?;
        let Some(current) = table_mut(&mut tables, table)?.rows.get(&id).cloned() else {
            return Ok(Vec::new());
        };
        let mut updated = current;
        for (k, v) in patch {
            if k != table.pk {
                updated.insert(k.clone(), v.clone());
            }
        }
        Self::check_not_null(table, &updated)?;
        self.check_references(&tables, table, patch)?;
        table_mut(&mut tables, table)?.rows.insert(id, updated.clone());
        Ok(vec![updated])
    }

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<Vec<Row>, StoreError> {
        let mut tables = self.tables.write().map_err(Self::poisoned)?;
        if !table_mut(&mut tables, table)?.rows.contains_key(&id) {
            return Ok(Vec::new());
        }
        for fk in self.foreign_keys.iter().filter(|fk| fk.references.name == table.name) {
            let referenced = tables.get(fk.table.name).map_or(false, |t| {
                t.rows
                    .values()
                    .any(|r| r.get(fk.column).and_then(Value::as_i64) == Some(id))
            });
            if referenced {
                return Err(StoreError::Conflict(format!(
                    "update or delete on table \"{}\" violates foreign key constraint \"{}\" on table \"{}\"",
                    table.name,
                    fk_name(fk),
                    fk.table.name
                )));
            }
        }
        let removed = table_mut(&mut tables, table)?.rows.remove(&id);
        Ok(removed.into_iter().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.tables.read().map(|_| ()).map_err(Self::poisoned)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CLIENTES, CLIENTE_PROYECTOS, PROYECTOS, TAREAS};
    use crate::store::Projection;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    async fn seed_client(store: &MemoryStore) -> i64 {
        let rows = store
            .insert(
                &CLIENTES,
                &row(json!({"nombre_contacto": "Ana", "empresa": "Acme", "email": "a@x.com"})),
            )
            .await
            .unwrap();
        rows[0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let store = MemoryStore::new();
        assert_eq!(seed_client(&store).await, 1);
        assert_eq!(seed_client(&store).await, 2);
    }

    #[tokio::test]
    async fn insert_with_dangling_reference_conflicts() {
        let store = MemoryStore::new();
        let err = store
            .insert(
                &PROYECTOS,
                &row(json!({"cliente_id": 99, "nombre_proyecto": "Web", "fecha_inicio": "2024-01-01"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_of_referenced_row_conflicts() {
        let store = MemoryStore::new();
        let cid = seed_client(&store).await;
        store
            .insert(
                &PROYECTOS,
                &row(json!({"cliente_id": cid, "nombre_proyecto": "Web", "fecha_inicio": "2024-01-01"})),
            )
            .await
            .unwrap();
        let err = store.delete(&CLIENTES, cid).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(msg) if msg.contains("proyectos_cliente_id_fkey")));
    }

    #[tokio::test]
    async fn missing_rows_yield_empty_results() {
        let store = MemoryStore::new();
        assert!(store.delete(&CLIENTES, 5).await.unwrap().is_empty());
        assert!(store
            .update(&CLIENTES, 5, &row(json!({"empresa": "X"})))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn select_embeds_and_filters() {
        let store = MemoryStore::new();
        let cid = seed_client(&store).await;
        let pid = store
            .insert(
                &PROYECTOS,
                &row(json!({"cliente_id": cid, "nombre_proyecto": "Web", "fecha_inicio": "2024-01-01"})),
            )
            .await
            .unwrap()[0]["id"]
            .as_i64()
            .unwrap();
        store
            .insert(&TAREAS, &row(json!({"proyecto_id": pid, "titulo": "Diseño"})))
            .await
            .unwrap();

        let clients = store
            .select(&Select::from(&CLIENTES).embed(&CLIENTE_PROYECTOS, Projection::All))
            .await
            .unwrap();
        assert_eq!(clients[0]["proyectos"][0]["nombre_proyecto"], "Web");

        let tareas = store.select(&Select::from(&TAREAS).eq("proyecto_id", pid)).await.unwrap();
        assert_eq!(tareas.len(), 1);
        let none = store.select(&Select::from(&TAREAS).eq("proyecto_id", pid + 1)).await.unwrap();
        assert!(none.is_empty());
    }
}
