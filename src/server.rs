//! JSON HTTP API over the catalog service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/health` | Health check (returns version) |
//! | `GET`    | `/apis?name=&sort=name\|team&order=asc\|desc` | List descriptors |
//! | `POST`   | `/apis` | Create a descriptor |
//! | `GET`    | `/apis/{id}` | Fetch one descriptor |
//! | `PATCH`  | `/apis/{id}` | Partial update |
//! | `DELETE` | `/apis/{id}` | Delete |
//! | `GET`    | `/apis/{id}/spec` | Resolved specification text |
//! | `GET`    | `/apis/{id}/spec/raw` | Stored specification location |
//! | `GET`    | `/apis/{id}/summary` | Generated summary |
//! | `GET`    | `/apis/{id}/docs/{doc_id}` | Documentation page |
//! | `GET`    | `/apis/{id}/docs/{doc_id}/validate` | Documentation reachability |
//! | `GET`    | `/doc-id?name=` | Derive a documentation id |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "API not found: 42" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `not_configured` (503),
//! `unsupported_provider` (503), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use api_catalog_core::models::{
    ApiDescriptor, ApiUpdate, DocumentationPage, ListFilter, ListOrder, NewApi, SortDirection,
    SortField,
};

use crate::error::CatalogError;
use crate::service::CatalogService;

/// Serve the catalog on `bind_addr` until the process exits.
pub async fn serve(service: Arc<CatalogService>, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("API catalog listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(service)).await?;
    Ok(())
}

/// Build the router. Exposed so tests and embedding binaries can mount it.
pub fn router(service: Arc<CatalogService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/apis", get(handle_list).post(handle_create))
        .route(
            "/apis/{id}",
            get(handle_get).patch(handle_update).delete(handle_delete),
        )
        .route("/apis/{id}/spec", get(handle_spec))
        .route("/apis/{id}/spec/raw", get(handle_spec_raw))
        .route("/apis/{id}/summary", get(handle_summary))
        .route("/apis/{id}/docs/{doc_id}", get(handle_doc))
        .route("/apis/{id}/docs/{doc_id}/validate", get(handle_doc_validate))
        .route("/doc-id", get(handle_doc_id))
        .layer(cors)
        .with_state(service)
}

type AppState = State<Arc<CatalogService>>;

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

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotConfigured(_) => AppError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: "not_configured",
                message: err.to_string(),
            },
            CatalogError::UnsupportedProvider(_) => AppError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: "unsupported_provider",
                message: err.to_string(),
            },
            CatalogError::Validation(_) => bad_request(err.to_string()),
            CatalogError::Store(ref inner) => {
                tracing::error!("Internal error: {:#}", inner);
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal",
                    message: "internal server error".to_string(),
                }
            }
        }
    }
}

fn api_not_found(id: &str) -> AppError {
    not_found(format!("API not found: {}", id))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    documentation: bool,
}

async fn handle_health(State(service): AppState) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        documentation: service.has_documentation(),
    })
}

// ============ Descriptors ============

#[derive(Debug, Deserialize)]
struct ListParams {
    name: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

async fn handle_list(
    State(service): AppState,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ApiDescriptor>>, AppError> {
    let field = match params.sort.as_deref() {
        Some(s) => s.parse::<SortField>().map_err(bad_request)?,
        None => SortField::default(),
    };
    let direction = match params.order.as_deref() {
        Some(s) => s.parse::<SortDirection>().map_err(bad_request)?,
        None => SortDirection::default(),
    };
    let filter = ListFilter {
        name_contains: params.name,
    };

    let apis = service
        .list_apis(&filter, ListOrder::new(field, direction))
        .await?;
    Ok(Json(apis))
}

async fn handle_create(
    State(service): AppState,
    Json(data): Json<NewApi>,
) -> Result<(StatusCode, Json<ApiDescriptor>), AppError> {
    let api = service.create_api(data).await?;
    Ok((StatusCode::CREATED, Json(api)))
}

async fn handle_get(
    State(service): AppState,
    Path(id): Path<String>,
) -> Result<Json<ApiDescriptor>, AppError> {
    service
        .get_api(&id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(&id))
}

async fn handle_update(
    State(service): AppState,
    Path(id): Path<String>,
    Json(update): Json<ApiUpdate>,
) -> Result<Json<ApiDescriptor>, AppError> {
    service
        .update_api(&id, update)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(&id))
}

async fn handle_delete(
    State(service): AppState,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if service.delete_api(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_not_found(&id))
    }
}

// ============ Specifications ============

async fn handle_spec(
    State(service): AppState,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let content = service
        .get_specification_content(&id)
        .await
        .ok_or_else(|| not_found(format!("specification unavailable for API: {}", id)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response())
}

#[derive(Serialize)]
struct RawLocationResponse {
    location: String,
}

async fn handle_spec_raw(
    State(service): AppState,
    Path(id): Path<String>,
) -> Result<Json<RawLocationResponse>, AppError> {
    let location = service
        .get_raw_specification_location(&id)
        .await?
        .ok_or_else(|| api_not_found(&id))?;
    Ok(Json(RawLocationResponse { location }))
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

async fn handle_summary(
    State(service): AppState,
    Path(id): Path<String>,
) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        summary: service.summarize_specification(&id).await,
    })
}

// ============ Documentation ============

async fn handle_doc(
    State(service): AppState,
    Path((id, doc_id)): Path<(String, String)>,
) -> Result<Json<DocumentationPage>, AppError> {
    service
        .get_documentation(&id, &doc_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(format!("documentation not found: {}/{}", id, doc_id)))
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
}

async fn handle_doc_validate(
    State(service): AppState,
    Path((id, doc_id)): Path<(String, String)>,
) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: service.validate_documentation(&id, &doc_id).await,
    })
}

#[derive(Debug, Deserialize)]
struct DocIdParams {
    name: String,
}

#[derive(Serialize)]
struct DocIdResponse {
    id: String,
}

async fn handle_doc_id(
    State(service): AppState,
    Query(params): Query<DocIdParams>,
) -> Result<Json<DocIdResponse>, AppError> {
    let id = service.generate_documentation_id(&params.name)?;
    Ok(Json(DocIdResponse { id }))
}
