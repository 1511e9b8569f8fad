use crate::handlers::Handlers;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use prism_common::{OperationOutput, PrismError};
use prism_guide::{GenerateOptions, SplitStrategy};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DesignRequest {
    design_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    design_url: String,
    #[serde(default)]
    component_name: Option<String>,
    #[serde(default)]
    include_typescript: Option<bool>,
    #[serde(default)]
    include_comments: Option<bool>,
    #[serde(default)]
    split_strategy: Option<SplitStrategy>,
}

pub fn router(handlers: Arc<Handlers>) -> Router {
    Router::new()
        .route("/operations/scan-catalog", post(scan_catalog))
        .route("/operations/analyze", post(analyze))
        .route("/operations/guide", post(guide))
        .route("/operations/generate", post(generate))
        .route("/components/:name", get(component_details))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(handlers)
}

pub async fn serve(handlers: Arc<Handlers>, port: u16) -> anyhow::Result<()> {
    let app = router(handlers);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Prism server listening on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn scan_catalog(
    State(handlers): State<Arc<Handlers>>,
) -> (StatusCode, Json<OperationOutput>) {
    respond(handlers.scan_catalog().await)
}

async fn analyze(
    State(handlers): State<Arc<Handlers>>,
    Json(request): Json<DesignRequest>,
) -> (StatusCode, Json<OperationOutput>) {
    respond(handlers.analyze_design(&request.design_url).await)
}

async fn guide(
    State(handlers): State<Arc<Handlers>>,
    Json(request): Json<DesignRequest>,
) -> (StatusCode, Json<OperationOutput>) {
    respond(handlers.generate_guide(&request.design_url).await)
}

async fn generate(
    State(handlers): State<Arc<Handlers>>,
    Json(request): Json<GenerateRequest>,
) -> (StatusCode, Json<OperationOutput>) {
    let options = GenerateOptions {
        component_name: request.component_name,
        include_typescript: request.include_typescript.unwrap_or(true),
        include_comments: request.include_comments.unwrap_or(false),
        split_strategy: request.split_strategy.unwrap_or_default(),
    };
    respond(handlers.generate_code(&request.design_url, &options).await)
}

async fn component_details(
    State(handlers): State<Arc<Handlers>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<OperationOutput>) {
    respond(handlers.get_component(&name).await)
}

/// Map handler results onto the wire: operation outcomes pass through,
/// errors become structured payloads with an appropriate status.
fn respond(result: prism_common::Result<OperationOutput>) -> (StatusCode, Json<OperationOutput>) {
    match result {
        Ok(output) => (StatusCode::OK, Json(output)),
        Err(err) => {
            let status = match &err {
                PrismError::Input(_) => StatusCode::BAD_REQUEST,
                PrismError::NotFound(_) => StatusCode::NOT_FOUND,
                PrismError::Config(_) => StatusCode::PRECONDITION_FAILED,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(OperationOutput::error(err.to_string())))
        }
    }
}
