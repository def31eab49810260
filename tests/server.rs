//! HTTP API tests: requests driven through the router in-process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use pokescout::fetch::PokemonSource;
use pokescout::server::{router, AppState};
use pokescout::store::Store;

fn sample_raw_pokemon() -> Value {
    json!({
        "name": "pikachu",
        "id": 25,
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "sprites": {"front_default": "https://example.com/front.png"},
        "types": [{"slot": 1, "type": {"name": "electric"}}],
        "abilities": [{"is_hidden": false, "slot": 1, "ability": {"name": "static"}}],
        "stats": [{"base_stat": 35, "effort": 0, "stat": {"name": "hp"}}]
    })
}

struct StubSource {
    payloads: HashMap<String, Value>,
}

impl StubSource {
    fn new(payloads: Vec<(&str, Value)>) -> Self {
        Self {
            payloads: payloads
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

#[async_trait]
impl PokemonSource for StubSource {
    async fn get_pokemon(&self, name: &str) -> Option<Value> {
        self.payloads.get(&name.trim().to_lowercase()).cloned()
    }

    async fn get_species(&self, _id: i64) -> Option<Value> {
        None
    }
}

async fn test_app(payloads: Vec<(&str, Value)>) -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("scout.db").display());
    let store = Store::connect(&url).await.unwrap();
    store.ensure_schema().await.unwrap();
    let state = AppState {
        store,
        source: Arc::new(StubSource::new(payloads)),
    };
    (router(state), dir)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn index_describes_the_service() {
    let (app, _dir) = test_app(Vec::new()).await;
    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pokemon Scout API");
    assert_eq!(body["version"], "1.0");
    assert!(body["endpoints"].is_object());
}

#[tokio::test]
async fn fetch_endpoint_stores_then_reports_existing() {
    let (app, _dir) = test_app(vec![("pikachu", sample_raw_pokemon())]).await;

    let (status, body) = get(app.clone(), "/api/pokemon/pikachu").await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("saved successfully"));
    assert_eq!(body["data"]["name"], "Pikachu");
    assert_eq!(body["data"]["pokedex_number"], 25);

    let (status, body) = get(app, "/api/pokemon/pikachu").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already in database"));
}

#[tokio::test]
async fn fetch_endpoint_reports_unknown_upstream() {
    let (app, _dir) = test_app(Vec::new()).await;

    let (status, body) = get(app, "/api/pokemon/unknownmon").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn list_endpoint_counts_stored_records() {
    let (app, _dir) = test_app(vec![("pikachu", sample_raw_pokemon())]).await;

    let (status, body) = get(app.clone(), "/api/pokemon").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    get(app.clone(), "/api/pokemon/pikachu").await;

    let (status, body) = get(app, "/api/pokemon").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["pokemon"][0]["name"], "Pikachu");
}

#[tokio::test]
async fn info_endpoint_returns_the_full_record_or_404() {
    let (app, _dir) = test_app(vec![("pikachu", sample_raw_pokemon())]).await;
    get(app.clone(), "/api/pokemon/pikachu").await;

    let (status, body) = get(app.clone(), "/api/pokemon/pikachu/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pikachu");
    assert_eq!(body["types"][0]["type"], "Electric");
    assert_eq!(body["abilities"][0]["ability"], "Static");
    assert_eq!(body["stats"][0]["stat"], "HP");

    let (status, body) = get(app, "/api/pokemon/mewtwo/info").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("not found in database"));
}
