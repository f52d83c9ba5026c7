//! One store call per operation. Payloads are validated before anything is sent.

use crate::error::AppError;
use crate::models::{to_row, ClientePatch, NuevoCliente, NuevoProyecto, ProyectoPatch};
use crate::schema::{TableDef, CLIENTES, CLIENTE_PROYECTOS, PROYECTOS, PROYECTO_CLIENTE, TAREAS};
use crate::service::Validate;
use crate::store::{Projection, Row, Select, TableStore};
use serde::Serialize;

/// Client columns exposed through the project listing.
pub const CLIENTE_RESUMEN: &[&str] = &["nombre_contacto", "empresa"];

pub struct GatewayService;

impl GatewayService {
    /// All clients, each with its projects under `proyectos`.
    pub async fn list_clientes(store: &dyn TableStore) -> Result<Vec<Row>, AppError> {
        let query = Select::from(&CLIENTES).embed(&CLIENTE_PROYECTOS, Projection::All);
        Ok(store.select(&query).await?)
    }

    pub async fn create_cliente(store: &dyn TableStore, body: &NuevoCliente) -> Result<Vec<Row>, AppError> {
        Self::create(store, &CLIENTES, body).await
    }

    pub async fn update_cliente(store: &dyn TableStore, id: i64, patch: &ClientePatch) -> Result<Vec<Row>, AppError> {
        Self::update(store, &CLIENTES, id, patch).await
    }

    pub async fn delete_cliente(store: &dyn TableStore, id: i64) -> Result<Vec<Row>, AppError> {
        Self::delete(store, &CLIENTES, id).await
    }

    /// All projects, each with its client's contact name and company under `clientes`.
    pub async fn list_proyectos(store: &dyn TableStore) -> Result<Vec<Row>, AppError> {
        let query = Select::from(&PROYECTOS).embed(&PROYECTO_CLIENTE, Projection::Columns(CLIENTE_RESUMEN));
        Ok(store.select(&query).await?)
    }

    pub async fn create_proyecto(store: &dyn TableStore, body: &NuevoProyecto) -> Result<Vec<Row>, AppError> {
        Self::create(store, &PROYECTOS, body).await
    }

    pub async fn update_proyecto(
        store: &dyn TableStore,
        id: i64,
        patch: &ProyectoPatch,
    ) -> Result<Vec<Row>, AppError> {
        Self::update(store, &PROYECTOS, id, patch).await
    }

    pub async fn delete_proyecto(store: &dyn TableStore, id: i64) -> Result<Vec<Row>, AppError> {
        Self::delete(store, &PROYECTOS, id).await
    }

    /// Tasks of one project. An unknown project simply has no tasks.
    pub async fn list_tareas_de_proyecto(store: &dyn TableStore, proyecto_id: i64) -> Result<Vec<Row>, AppError> {
        let query = Select::from(&TAREAS).eq("proyecto_id", proyecto_id);
        Ok(store.select(&query).await?)
    }

    async fn create<T>(store: &dyn TableStore, table: &'static TableDef, body: &T) -> Result<Vec<Row>, AppError>
    where
        T: Validate + Serialize + Sync,
    {
        body.validate()?;
        let row = to_row(body)?;
        Ok(store.insert(table, &row).await?)
    }

    async fn update<T>(
        store: &dyn TableStore,
        table: &'static TableDef,
        id: i64,
        patch: &T,
    ) -> Result<Vec<Row>, AppError>
    where
        T: Validate + Serialize + Sync,
    {
        patch.validate()?;
        let row = to_row(patch)?;
        let rows = store.update(table, id, &row).await?;
        if rows.is_empty() {
            return Err(not_found(table, id));
        }
        Ok(rows)
    }

    async fn delete(store: &dyn TableStore, table: &'static TableDef, id: i64) -> Result<Vec<Row>, AppError> {
        let rows = store.delete(table, id).await?;
        if rows.is_empty() {
            return Err(not_found(table, id));
        }
        Ok(rows)
    }
}

fn not_found(table: &TableDef, id: i64) -> AppError {
    AppError::NotFound(format!("no row in {} with {} = {}", table.name, table.pk, id))
}
