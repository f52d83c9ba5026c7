//! Direct PostgreSQL backend over a sqlx pool.

use super::{Row, Select, TableStore};
use crate::config::PostgresStoreConfig;
use crate::error::StoreError;
use crate::schema::TableDef;
use crate::sql::{self, PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    /// Open a pool for `config`. Connection happens lazily on first query.
    pub fn connect_lazy(config: &PostgresStoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.database_url)?;
        Ok(Self::new(pool, config.schema.clone()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Row>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

#[async_trait]
impl TableStore for PgStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        self.fetch_all(&sql::select(&self.schema, query)).await
    }

    async fn insert(&self, table: &'static TableDef, row: &Row) -> Result<Vec<Row>, StoreError> {
        self.fetch_all(&sql::insert(&self.schema, table, row)).await
    }

    async fn update(&self, table: &'static TableDef, id: i64, patch: &Row) -> Result<Vec<Row>, StoreError> {
        self.fetch_all(&sql::update(&self.schema, table, id, patch)).await
    }

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<Vec<Row>, StoreError> {
        self.fetch_all(&sql::delete(&self.schema, table, id)).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Create the schema and the three tables when missing. Idempotent.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    let s = quote(schema);
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {}", s),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."clientes" (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                nombre_contacto TEXT NOT NULL,
                empresa TEXT NOT NULL,
                email TEXT NOT NULL,
                telefono TEXT,
                estado TEXT
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."proyectos" (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                cliente_id BIGINT NOT NULL REFERENCES {s}."clientes"(id),
                nombre_proyecto TEXT NOT NULL,
                descripcion TEXT,
                fecha_inicio DATE NOT NULL,
                fecha_fin DATE,
                estado TEXT
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."tareas" (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                proyecto_id BIGINT NOT NULL REFERENCES {s}."proyectos"(id),
                titulo TEXT NOT NULL,
                descripcion TEXT,
                estado TEXT,
                fecha_limite DATE
            )
            "#
        ),
        format!(r#"CREATE INDEX IF NOT EXISTS proyectos_cliente_id_idx ON {s}."proyectos" (cliente_id)"#),
        format!(r#"CREATE INDEX IF NOT EXISTS tareas_proyecto_id_idx ON {s}."tareas" (proyecto_id)"#),
    ];
    for ddl in &statements {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(schema, "store tables ensured");
    Ok(())
}

fn row_to_json(row: &PgRow) -> Row {
    use sqlx::Column;
    use sqlx::Row as _;
    let mut map = Row::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row as _;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
