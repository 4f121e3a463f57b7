//! HTTP layer: input form, result pages, downloads and generated images.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{config::Settings, pipeline::Pipeline, viz::STATIC_ROUTE};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub pipeline: Arc<Pipeline>,
}

pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.static_dir);
    Router::new()
        .route("/", get(routes::index))
        .route("/extract_entities", post(routes::extract_entities))
        .route("/predict_file", post(routes::predict_file))
        .route("/download/:filename", get(routes::download))
        .route("/api/entities", post(routes::entities_json))
        .nest_service(STATIC_ROUTE, static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: String, port: u16) -> Result<()> {
    let router = router(state);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving entity-lens");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
