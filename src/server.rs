//! HTTP API front-end.
//!
//! Endpoints:
//! - GET /                        - Service descriptor
//! - GET /api/pokemon/:name       - Fetch-and-store one pokemon
//! - GET /api/pokemon             - List all stored pokemon
//! - GET /api/pokemon/:name/info  - Stored record details

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ScoutError;
use crate::fetch::PokemonSource;
use crate::models::PokemonRecord;
use crate::pipeline::{fetch_and_store, FetchOutcome};
use crate::store::Store;
use crate::utils::capitalize;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub source: Arc<dyn PokemonSource>,
}

type ApiError = (StatusCode, Json<Value>);

fn error_body(status: StatusCode, message: String) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/pokemon", get(list_pokemon))
        .route("/api/pokemon/:name", get(get_and_store_pokemon))
        .route("/api/pokemon/:name/info", get(get_pokemon_info))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, bind: &str) -> Result<(), ScoutError> {
    let app = router(state);
    tracing::info!("pokescout API listening on {}", bind);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Pokemon Scout API",
        "version": "1.0",
        "endpoints": {
            "/api/pokemon/<name>": "GET - Fetch and store Pokemon",
            "/api/pokemon": "GET - List all Pokemon",
            "/api/pokemon/<name>/info": "GET - Get Pokemon details"
        }
    }))
}

/// GET /api/pokemon/:name
///
/// 200 when already stored, 201 when newly stored, 404 when upstream has no
/// such pokemon, 500 on a processing or persistence failure.
async fn get_and_store_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    match fetch_and_store(&state.store, state.source.as_ref(), &name).await {
        Ok(FetchOutcome::AlreadyStored(record)) => Ok((
            StatusCode::OK,
            Json(json!({
                "message": format!("{} already in database", record.name),
                "data": record,
            })),
        )),
        Ok(FetchOutcome::Stored(record)) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": format!("{} saved successfully", record.name),
                "data": record,
            })),
        )),
        Ok(FetchOutcome::NotFound) => Err(error_body(
            StatusCode::NOT_FOUND,
            format!("Pokemon {} not found", name),
        )),
        Err(ScoutError::MalformedPayload) => Err(error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process data".to_string(),
        )),
        Err(e) => Err(error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: {}", e),
        )),
    }
}

/// GET /api/pokemon
async fn list_pokemon(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let all = state.store.list_all().await.map_err(|e| {
        error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: {}", e),
        )
    })?;
    Ok(Json(json!({ "count": all.len(), "pokemon": all })))
}

/// GET /api/pokemon/:name/info
async fn get_pokemon_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PokemonRecord>, ApiError> {
    let record = state
        .store
        .find_by_name(&capitalize(name.trim()))
        .await
        .map_err(|e| {
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred: {}", e),
            )
        })?;

    match record {
        Some(record) => Ok(Json(record)),
        None => Err(error_body(
            StatusCode::NOT_FOUND,
            format!("Pokemon {} not found in database", name),
        )),
    }
}
