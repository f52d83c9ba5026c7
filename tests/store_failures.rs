//! Every route against a store that cannot be reached.

mod common;

use axum::http::{Method, StatusCode};
use common::{app_with, assert_error_body, get, send};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use techsolutions_gateway::config::RestStoreConfig;
use techsolutions_gateway::{RestStore, TableStore};

fn unreachable_app() -> axum::Router {
    let store = RestStore::new(&RestStoreConfig {
        url: "http://127.0.0.1:1".into(),
        key: "test-key".into(),
        timeout: Duration::from_secs(2),
    })
    .expect("client");
    app_with(Arc::new(store) as Arc<dyn TableStore>)
}

#[tokio::test]
async fn every_store_route_fails_with_500_and_message() {
    let app = unreachable_app();
    let cliente = json!({"nombre_contacto":"Ana","empresa":"Acme","email":"a@x.com"});
    let proyecto = json!({"cliente_id": 1, "nombre_proyecto": "Web", "fecha_inicio": "2024-01-01"});
    let requests = [
        (Method::GET, "/api/clientes", None),
        (Method::POST, "/api/clientes", Some(cliente)),
        (Method::PUT, "/api/clientes/1", Some(json!({"empresa": "X"}))),
        (Method::DELETE, "/api/clientes/1", None),
        (Method::GET, "/api/proyectos", None),
        (Method::POST, "/api/proyectos", Some(proyecto)),
        (Method::PUT, "/api/proyectos/1", Some(json!({"estado": "Finalizado"}))),
        (Method::DELETE, "/api/proyectos/1", None),
        (Method::GET, "/api/tareas/proyecto/1", None),
    ];
    for (method, uri, body) in requests {
        let (status, resp) = send(&app, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {} -> {}", method, uri, resp);
        assert_error_body(&resp);
        assert_eq!(resp["code"], "store_unavailable");
    }

    // still serving after the failures
    let (status, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn readiness_degrades_without_store() {
    let app = unreachable_app();
    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "degraded", "store": "unavailable"}));

    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn validation_still_runs_before_the_store() {
    let app = unreachable_app();
    let (status, body) = send(&app, Method::POST, "/api/clientes", Some(json!({"empresa": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_body(&body);
}
