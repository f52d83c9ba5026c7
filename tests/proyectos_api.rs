mod common;

use axum::http::{Method, StatusCode};
use common::{assert_error_body, create_cliente, get, memory_app, send};
use serde_json::{json, Value};
use techsolutions_gateway::schema::TAREAS;
use techsolutions_gateway::TableStore;

async fn setup() -> (axum::Router, std::sync::Arc<techsolutions_gateway::MemoryStore>, i64) {
    let (app, store) = memory_app();
    let cliente = create_cliente(
        &app,
        json!({"nombre_contacto":"Ana","empresa":"Acme","email":"a@x.com","telefono":"555"}),
    )
    .await;
    (app, store, cliente)
}

async fn create_proyecto(app: &axum::Router, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, "/api/proyectos", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json[0]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn listing_embeds_only_contact_and_company() {
    let (app, _, cliente) = setup().await;
    create_proyecto(
        &app,
        json!({
            "cliente_id": cliente.to_string(), "nombre_proyecto": "Portal", "descripcion": "",
            "fecha_inicio": "2024-02-01", "fecha_fin": "", "estado": "Planificación"
        }),
    )
    .await;

    let (status, list) = get(&app, "/api/proyectos").await;
    assert_eq!(status, StatusCode::OK);
    let entries = list.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    for p in entries {
        assert_eq!(p["clientes"], json!({"nombre_contacto": "Ana", "empresa": "Acme"}));
    }
    assert_eq!(entries[0]["cliente_id"], cliente);
    assert_eq!(entries[0]["fecha_fin"], Value::Null);
}

#[tokio::test]
async fn put_returns_updated_rows_and_delete_returns_message() {
    let (app, _, cliente) = setup().await;
    let id = create_proyecto(
        &app,
        json!({"cliente_id": cliente, "nombre_proyecto": "Portal", "fecha_inicio": "2024-02-01"}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/proyectos/{}", id),
        Some(json!({"estado": "En Progreso", "fecha_fin": "2024-06-30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["estado"], "En Progreso");
    assert_eq!(body[0]["fecha_fin"], "2024-06-30");
    assert_eq!(body[0]["nombre_proyecto"], "Portal");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/proyectos/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Proyecto eliminado"}));

    let (_, list) = get(&app, "/api/proyectos").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn project_for_missing_client_conflicts() {
    let (app, _, _) = setup().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proyectos",
        Some(json!({"cliente_id": 404, "nombre_proyecto": "Portal", "fecha_inicio": "2024-02-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_body(&body);
}

#[tokio::test]
async fn project_validation() {
    let (app, _, cliente) = setup().await;
    let cases = [
        json!({"cliente_id": cliente, "nombre_proyecto": "Portal"}),
        json!({"cliente_id": cliente, "nombre_proyecto": "Portal", "fecha_inicio": "01/02/2024"}),
        json!({"cliente_id": cliente, "nombre_proyecto": "Portal", "fecha_inicio": "2024-02-01", "fecha_fin": "2024-01-01"}),
        json!({"cliente_id": cliente, "nombre_proyecto": "Portal", "fecha_inicio": "2024-02-01", "estado": "Cancelado"}),
        json!({"cliente_id": "abc", "nombre_proyecto": "Portal", "fecha_inicio": "2024-02-01"}),
    ];
    for body in cases {
        let (status, resp) = send(&app, Method::POST, "/api/proyectos", Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} -> {}", body, resp);
        assert_error_body(&resp);
    }

    let (status, _) = send(&app, Method::PUT, "/api/proyectos/1", Some(json!({"nombre_proyecto": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_project_ids_are_not_found() {
    let (app, _, _) = setup().await;
    let (status, _) = send(&app, Method::PUT, "/api/proyectos/7", Some(json!({"estado": "Finalizado"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/api/proyectos/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tasks_are_filtered_by_project() {
    let (app, store, cliente) = setup().await;
    let con_tareas = create_proyecto(
        &app,
        json!({"cliente_id": cliente, "nombre_proyecto": "Portal", "fecha_inicio": "2024-02-01"}),
    )
    .await;
    let sin_tareas = create_proyecto(
        &app,
        json!({"cliente_id": cliente, "nombre_proyecto": "App", "fecha_inicio": "2024-03-01"}),
    )
    .await;
    for titulo in ["Diseño", "Backend"] {
        let row = json!({"proyecto_id": con_tareas, "titulo": titulo});
        store.insert(&TAREAS, row.as_object().unwrap()).await.unwrap();
    }

    let (status, tareas) = get(&app, &format!("/api/tareas/proyecto/{}", con_tareas)).await;
    assert_eq!(status, StatusCode::OK);
    let titulos: Vec<&str> = tareas.as_array().unwrap().iter().map(|t| t["titulo"].as_str().unwrap()).collect();
    assert_eq!(titulos, vec!["Diseño", "Backend"]);

    let (status, tareas) = get(&app, &format!("/api/tareas/proyecto/{}", sin_tareas)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tareas, json!([]));

    let (status, tareas) = get(&app, "/api/tareas/proyecto/12345").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tareas, json!([]));

    let (status, _) = get(&app, "/api/tareas/proyecto/uno").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
