//! `/api/tareas` handlers.

use crate::error::AppError;
use crate::extractors::RecordId;
use crate::service::GatewayService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /api/tareas/proyecto/:id
pub async fn list_by_proyecto(
    State(state): State<AppState>,
    RecordId(proyecto_id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let rows = GatewayService::list_tareas_de_proyecto(state.store.as_ref(), proyecto_id).await?;
    Ok(Json(rows))
}
