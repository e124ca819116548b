use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};
use crate::pricing::ModeResolver;

/// Full application router with the JSON API under `/api`
pub fn app(resolver: ModeResolver) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(AppState::new(resolver)))
        .layer(cors)
}

pub async fn run(resolver: ModeResolver, port: u16) -> anyhow::Result<()> {
    let app = app(resolver);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app)
        .await
        .context("Web server stopped unexpectedly")?;
    Ok(())
}
