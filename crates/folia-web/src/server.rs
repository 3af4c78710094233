use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use folia_config::HttpConfig;

use crate::routes::{detail_routes, filter_routes, health_routes, image_routes, search_routes};
use crate::state::AppState;
use crate::{Result, WebError};

/// Every route with body limit, request tracing and optional CORS.
pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    let app = Router::new()
        .merge(health_routes())
        .merge(filter_routes())
        .merge(detail_routes())
        .merge(search_routes())
        .merge(image_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_request_bytes()))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server<F>(config: &HttpConfig, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, config);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|e| WebError::Config(format!("{e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting web server on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Web server stopped");
    Ok(())
}
