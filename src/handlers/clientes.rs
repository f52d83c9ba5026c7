//! `/api/clientes` handlers.

use crate::error::AppError;
use crate::extractors::{JsonBody, RecordId};
use crate::models::{ClientePatch, NuevoCliente};
use crate::response::{status_data, status_message};
use crate::service::GatewayService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::list_clientes(state.store.as_ref()).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NuevoCliente>,
) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::create_cliente(state.store.as_ref(), &body).await?;
    tracing::info!(count = rows.len(), "cliente created");
    Ok((StatusCode::CREATED, Json(rows)))
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(patch): JsonBody<ClientePatch>,
) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::update_cliente(state.store.as_ref(), id, &patch).await?;
    Ok(Json(status_data(rows)))
}

pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> Result<impl IntoResponse, AppError> {
    GatewayService::delete_cliente(state.store.as_ref(), id).await?;
    tracing::info!(id, "cliente deleted");
    Ok(Json(status_message("Cliente eliminado")))
}
