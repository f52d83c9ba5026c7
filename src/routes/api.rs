//! Resource routes under `/api`.

use crate::handlers::{clientes, proyectos, tareas};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/clientes", get(clientes::list).post(clientes::create))
        .route("/clientes/:id", put(clientes::update).delete(clientes::delete))
        .route("/proyectos", get(proyectos::list).post(proyectos::create))
        .route("/proyectos/:id", put(proyectos::update).delete(proyectos::delete))
        .route("/tareas/proyecto/:id", get(tareas::list_by_proyecto))
        .with_state(state)
}
