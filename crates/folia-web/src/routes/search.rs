//! Entity and graph search
//!
//! Both searches are CPU bound and run on the blocking pool against one
//! snapshot generation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{routing::post, Json, Router};

use folia_query::{
    run_graph_search, run_search, GraphResponse, GraphSearchQuery, SearchQuery, SearchResponse,
};

use crate::error::{Result, WebError};
use crate::state::AppState;

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/entities/search", post(search_entities))
        .route("/graphs/search", post(search_graph))
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| WebError::Validation(rejection.body_text()))
}

async fn search_entities(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<SearchResponse>> {
    let query = body(payload)?;
    query.validate()?;
    let snapshot = state.snapshot()?;
    let response = tokio::task::spawn_blocking(move || run_search(&snapshot, &query))
        .await
        .map_err(|e| WebError::Internal(format!("Search task failed: {e}")))??;
    Ok(Json(response))
}

async fn search_graph(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GraphSearchQuery>, JsonRejection>,
) -> Result<Json<GraphResponse>> {
    let query = body(payload)?;
    query.validate()?;
    let snapshot = state.snapshot()?;
    let response = tokio::task::spawn_blocking(move || run_graph_search(&snapshot, &query))
        .await
        .map_err(|e| {
            WebError::Internal(format!("An error occurred while generating the graph: {e}"))
        })??;
    Ok(Json(response))
}
