use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use serde::Deserialize;

use folia_core::{FilterBucket, ALL_PROJECTS};

use crate::error::{Result, WebError};
use crate::state::AppState;

pub fn filter_routes() -> Router<AppState> {
    Router::new().route("/filters/options", get(filter_options))
}

#[derive(Debug, Deserialize)]
struct FilterOptionsQuery {
    project: Option<String>,
}

/// Search-form vocabularies of one project, the aggregate when none is named.
async fn filter_options(
    State(state): State<AppState>,
    Query(query): Query<FilterOptionsQuery>,
) -> Result<Json<FilterBucket>> {
    let snapshot = state.snapshot()?;
    let project = query
        .project
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| ALL_PROJECTS.to_string());
    snapshot
        .filters()
        .for_project(&project)
        .cloned()
        .map(Json)
        .ok_or_else(|| WebError::NotFound(format!("Project '{project}' not found")))
}
