//! HTTP API server.
//!
//! Exposes catalog search, trending, and detail lookup plus the design and
//! alert pass-through endpoints as a JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Service banner |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/catalog/search`, `/api/search` | Filter the catalog by query parameters |
//! | `GET`  | `/catalog/trending`, `/api/trending` | Trending selection, `?limit=` |
//! | `GET`  | `/catalog/{id}`, `/api/sneakers/{id}` | Single record by id |
//! | `POST` | `/api/designs` | Save a design |
//! | `GET`  | `/api/designs` | List designs, `?userId=&sneakerId=` |
//! | `POST` | `/api/alerts` | Create an alert |
//! | `GET`  | `/api/alerts` | List alerts, `?userId=&sneakerId=` |
//! | `GET`  | `/test` | Database diagnostics |
//!
//! The catalog file is re-read on every catalog request; nothing is cached
//! between requests.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "sneaker not found: aj1" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use sneakpeak_core::catalog::{self, Criteria};
use sneakpeak_core::models::{NewAlert, NewDesign, SneakerRecord};
use sneakpeak_core::store::DocumentStore;

use crate::config::Config;
use crate::documents::{self, OwnerFilter};
use crate::loader;
use crate::search::validate_criteria;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
}

/// Starts the HTTP server on `[server].bind` backed by the SQLite store.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(config).await?;
    run_server_with_store(config, Arc::new(store)).await
}

/// Starts the HTTP server with a caller-supplied document store.
pub async fn run_server_with_store(
    config: &Config,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()), store);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        bind = %bind_addr,
        catalog = %config.catalog.path.display(),
        "SneakPeak API listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/catalog/search", get(handle_search))
        .route("/catalog/trending", get(handle_trending))
        .route("/catalog/{id}", get(handle_detail))
        .route("/api/search", get(handle_search))
        .route("/api/trending", get(handle_trending))
        .route("/api/sneakers/{id}", get(handle_detail))
        .route("/api/designs", get(handle_list_designs).post(handle_save_design))
        .route("/api/alerts", get(handle_list_alerts).post(handle_create_alert))
        .route("/test", get(handle_db_test))
        .layer(cors)
        .with_state(AppState { config, store })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(err: anyhow::Error) -> AppError {
    let detail = format!("{:#}", err);
    error!(error = %detail, "request failed");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: err.to_string(),
    }
}

/// Store errors whose message starts with `invalid` are caller mistakes.
fn classify(err: anyhow::Error) -> AppError {
    if err.to_string().starts_with("invalid") {
        bad_request(err.to_string())
    } else {
        internal(err)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

// ============ GET / and /health ============

async fn handle_root() -> Json<Value> {
    Json(json!({ "name": "SneakPeak API", "status": "ok" }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ Catalog ============

/// `GET /catalog/search`. Query parameters map one-to-one onto [`Criteria`].
async fn handle_search(
    State(state): State<AppState>,
    query: Result<Query<Criteria>, QueryRejection>,
) -> Result<Json<Vec<SneakerRecord>>, AppError> {
    let Query(criteria) = query?;
    validate_criteria(&criteria).map_err(|e| bad_request(e.to_string()))?;

    let records = loader::load(&state.config);
    let results = catalog::filter(&records, &criteria)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(results))
}

#[derive(Debug, Deserialize)]
struct TrendingParams {
    limit: Option<i64>,
}

/// `GET /catalog/trending?limit=N`. Defaults to `[trending].default_limit`.
async fn handle_trending(
    State(state): State<AppState>,
    query: Result<Query<TrendingParams>, QueryRejection>,
) -> Result<Json<Vec<SneakerRecord>>, AppError> {
    let Query(params) = query?;
    let limit = match params.limit {
        None => state.config.trending.default_limit,
        Some(n) if n >= 1 => n as usize,
        Some(_) => return Err(bad_request("invalid limit: must be >= 1")),
    };

    let records = loader::load(&state.config);
    let results = catalog::trending(&records, limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(results))
}

/// `GET /catalog/{id}`. 404 when no record has this id.
async fn handle_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SneakerRecord>, AppError> {
    let records = loader::load(&state.config);
    catalog::find_by_id(&records, &id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("sneaker not found: {}", id)))
}

// ============ Designs & alerts ============

async fn handle_save_design(
    State(state): State<AppState>,
    body: Result<Json<NewDesign>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(design) = body?;
    let id = documents::save_design(state.store.as_ref(), design)
        .await
        .map_err(classify)?;
    Ok(Json(json!({ "id": id })))
}

async fn handle_list_designs(
    State(state): State<AppState>,
    query: Result<Query<OwnerFilter>, QueryRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    let Query(filter) = query?;
    let docs = documents::list_designs(state.store.as_ref(), &filter)
        .await
        .map_err(internal)?;
    Ok(Json(docs))
}

async fn handle_create_alert(
    State(state): State<AppState>,
    body: Result<Json<NewAlert>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(alert) = body?;
    let id = documents::create_alert(state.store.as_ref(), alert)
        .await
        .map_err(classify)?;
    Ok(Json(json!({ "id": id })))
}

async fn handle_list_alerts(
    State(state): State<AppState>,
    query: Result<Query<OwnerFilter>, QueryRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    let Query(filter) = query?;
    let docs = documents::list_alerts(state.store.as_ref(), &filter)
        .await
        .map_err(internal)?;
    Ok(Json(docs))
}

// ============ GET /test ============

#[derive(Serialize)]
struct DbTestResponse {
    backend: String,
    database: String,
    database_path: String,
    connection_status: String,
    collections: Vec<String>,
}

/// Reports whether the document store answers, and which collections it holds.
async fn handle_db_test(State(state): State<AppState>) -> Json<DbTestResponse> {
    let mut response = DbTestResponse {
        backend: "running".to_string(),
        database: "not available".to_string(),
        database_path: state.config.db.path.display().to_string(),
        connection_status: "not connected".to_string(),
        collections: Vec::new(),
    };

    match state.store.collections().await {
        Ok(mut names) => {
            names.truncate(10);
            response.database = "connected".to_string();
            response.connection_status = "connected".to_string();
            response.collections = names;
        }
        Err(e) => {
            let msg = e.to_string();
            response.database = format!("error: {}", msg.chars().take(50).collect::<String>());
        }
    }

    Json(response)
}
