//! Tests for the HTTP client against an in-process fake API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use geolab_client::{
    ApiError, ClientConfig, LabApiClient, RemoteSync, SessionBus, SessionEvent,
};
use geolab_model::FormKind;
use geolab_persistence::{MemoryStore, TokenStore};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct Recorded {
    query: HashMap<String, String>,
    authorization: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn excel(
    State(log): State<Log>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    let download = query.get("download").map(String::as_str) == Some("true");
    log.lock().unwrap().push(Recorded {
        query,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    if download {
        ([("x-equi-arena-id", "41")], vec![0x50, 0x4b, 0x03, 0x04]).into_response()
    } else {
        Json(json!({
            "id": 41,
            "numero_ensayo": "EA-0041",
            "numero_ot": "120-26",
            "estado": "GUARDADO",
            "equivalente_arena_promedio_pct": 96.0,
        }))
        .into_response()
    }
}

async fn detail(Path(id): Path<u64>) -> axum::response::Response {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Ensayo no encontrado"})),
        )
            .into_response();
    }
    Json(json!({
        "id": id,
        "numero_ensayo": "EA-0007",
        "numero_ot": "55-26",
        "estado": "GUARDADO",
        "payload": {"muestra": "9-SU-26", "lectura_arena_in": [3.1]},
    }))
    .into_response()
}

async fn listing(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
    let rows: Vec<Value> = (1..=limit.min(3))
        .map(|id| json!({"id": id, "numero_ensayo": format!("GA-{id}"), "numero_ot": "1-26", "estado": "GUARDADO"}))
        .collect();
    Json(Value::Array(rows))
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_api() -> (String, Log) {
    let log = Log::default();
    let app = Router::new()
        .route("/api/equi-arena/excel", post(excel))
        .route("/api/equi-arena/:id", get(detail))
        .route("/api/gran-agregado/", get(listing))
        .with_state(log.clone());
    (spawn(app).await, log)
}

fn client(base: &str, token: Option<&str>, session: SessionBus) -> LabApiClient {
    let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
    if let Some(token) = token {
        tokens.set_token(token).unwrap();
    }
    LabApiClient::new(&ClientConfig::default().with_base_url(base), tokens, session).unwrap()
}

#[tokio::test]
async fn save_posts_payload_with_bearer_token() {
    let (base, log) = fake_api().await;
    let api = client(&base, Some("tok-1"), SessionBus::new());

    let receipt = api
        .save(FormKind::SandEquivalent, json!({"muestra": "1-SU-26"}), None)
        .await
        .unwrap();
    assert_eq!(receipt.id, 41);
    assert_eq!(receipt.report_number, "EA-0041");
    assert_eq!(
        receipt.computed.get("equivalente_arena_promedio_pct"),
        Some(&json!(96.0))
    );

    let recorded = log.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer tok-1"));
    assert_eq!(recorded[0].query.get("download").map(String::as_str), Some("false"));
    assert!(!recorded[0].query.contains_key("ensayo_id"));
    assert_eq!(recorded[0].body, json!({"muestra": "1-SU-26"}));
}

#[tokio::test]
async fn export_returns_bytes_and_id_header() {
    let (base, log) = fake_api().await;
    let api = client(&base, None, SessionBus::new());

    let artifact = api
        .save_and_export(FormKind::SandEquivalent, json!({}), Some(41))
        .await
        .unwrap();
    assert_eq!(artifact.bytes, vec![0x50, 0x4b, 0x03, 0x04]);
    assert_eq!(artifact.report_id, Some(41));

    let recorded = log.lock().unwrap().clone();
    assert_eq!(recorded[0].authorization, None);
    assert_eq!(recorded[0].query.get("ensayo_id").map(String::as_str), Some("41"));
}

#[tokio::test]
async fn fetch_returns_payload() {
    let (base, _) = fake_api().await;
    let api = client(&base, Some("t"), SessionBus::new());

    let detail = api.fetch_by_id(FormKind::SandEquivalent, 7).await.unwrap();
    assert_eq!(detail.summary.id, 7);
    assert_eq!(
        detail.payload,
        Some(json!({"muestra": "9-SU-26", "lectura_arena_in": [3.1]}))
    );
}

#[tokio::test]
async fn error_detail_is_surfaced() {
    let (base, _) = fake_api().await;
    let api = client(&base, Some("t"), SessionBus::new());

    let err = api.fetch_by_id(FormKind::SandEquivalent, 404).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
    assert_eq!(err.user_message(), "Ensayo no encontrado");
}

#[tokio::test]
async fn list_passes_limit() {
    let (base, _) = fake_api().await;
    let api = client(&base, Some("t"), SessionBus::new());

    let rows = api.list(FormKind::Gradation, 100).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].report_number, "GA-3");
}

#[tokio::test]
async fn unauthorized_publishes_session_expired() {
    let app = Router::new().fallback(|| async { StatusCode::UNAUTHORIZED });
    let base = spawn(app).await;
    let session = SessionBus::new();
    let events = session.subscribe();
    let api = client(&base, Some("stale"), session);

    let err = api
        .save(FormKind::Gradation, json!({}), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(events.drain(), vec![SessionEvent::SessionExpired]);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}"), None, SessionBus::new());
    let err = api.list(FormKind::SandEquivalent, 10).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.is_retryable());
}
