//! `/api/proyectos` handlers.

use crate::error::AppError;
use crate::extractors::{JsonBody, RecordId};
use crate::models::{NuevoProyecto, ProyectoPatch};
use crate::response::Message;
use crate::service::GatewayService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::list_proyectos(state.store.as_ref()).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NuevoProyecto>,
) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::create_proyecto(state.store.as_ref(), &body)
        .await
        .inspect_err(|e| tracing::error!(error = %e, cliente_id = body.cliente_id, "proyecto insert failed"))?;
    Ok((StatusCode::CREATED, Json(rows)))
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(patch): JsonBody<ProyectoPatch>,
) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::update_proyecto(state.store.as_ref(), id, &patch).await?;
    Ok(Json(rows))
}

pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> Result<impl IntoResponse, AppError> {
    GatewayService::delete_proyecto(state.store.as_ref(), id).await?;
    tracing::info!(id, "proyecto deleted");
    Ok(Json(Message {
        message: "Proyecto eliminado",
    }))
}
