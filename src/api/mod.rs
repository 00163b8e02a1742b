pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{ingest::IngestService, status::StatusService};

use handlers::ApiDoc;

/// Shared by every request. The two services only meet at the report store.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
    pub status: Arc<StatusService>,
}

impl AppState {
    pub fn new(ingest: IngestService, status: StatusService) -> Self {
        Self {
            ingest: Arc::new(ingest),
            status: Arc::new(status),
        }
    }
}

pub fn router(state: AppState) -> Router {
    // The station firmware posts to `/index.php`; browsers may use either path.
    let station = get(handlers::status_page).post(handlers::submit);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/", station.clone())
        .route("/index.php", station)
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
