pub mod rest;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::{OpenApi, openapi::server::Server};
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{config::REQUEST_TIMEOUT, service::NoteService};

/// Notes API mounted under `base_path` (empty for the root), plus Swagger UI.
pub fn router(service: Arc<NoteService>, base_path: &str) -> Router {
    let api = Router::new()
        .route("/health", get(rest::health_check))
        .route("/notes", post(rest::create_note).get(rest::get_all_notes))
        .route(
            "/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .with_state(service);

    let mut doc = rest::ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(if base_path.is_empty() {
        "/"
    } else {
        base_path
    })]);

    let app = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(base_path, api)
    };

    app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", doc))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
}
