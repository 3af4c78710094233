use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use serde_json::Value;
use tracing::debug;

use folia_query::lookup_detail;

use crate::error::{Result, WebError};
use crate::state::AppState;

pub fn detail_routes() -> Router<AppState> {
    Router::new().route("/details/{entity}/{id}", get(get_details))
}

async fn get_details(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let snapshot = state.snapshot()?;
    let entry = lookup_detail(&snapshot, &entity, &id)?;
    debug!(entity = %entity, id = %id, "Detail lookup");
    serde_json::to_value(entry)
        .map(Json)
        .map_err(|e| WebError::Internal(format!("Failed to encode detail: {e}")))
}
