//! Project images
//!
//! Files live in `<images_dir>/<project>/`. The request names an image by
//! its stem, so `/images/aldine/cover` serves `cover.jpg` or `cover.png`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use std::path::PathBuf;
use tokio::fs;

use crate::error::{Result, WebError};
use crate::state::AppState;

pub fn image_routes() -> Router<AppState> {
    Router::new().route("/images/{project}/{image}", get(get_image))
}

fn is_valid_segment(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

async fn find_by_stem(dir: &std::path::Path, stem: &str) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.file_stem().is_some_and(|s| s == stem) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

async fn get_image(
    State(state): State<AppState>,
    Path((project, image)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    if !is_valid_segment(&project) || !is_valid_segment(&image) {
        return Err(WebError::Validation(
            "Invalid image path: traversal not allowed".to_string(),
        ));
    }

    let dir = state.images_dir.join(&project);
    if !dir.is_dir() {
        return Err(WebError::NotFound("Project folder not found".to_string()));
    }
    let path = find_by_stem(&dir, &image)
        .await?
        .ok_or_else(|| WebError::NotFound("Image not found".to_string()))?;

    let bytes = Bytes::from(fs::read(&path).await?);
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_segments_are_rejected() {
        for name in ["..", "../etc", "a/b", "a\\b", "nul\0", ""] {
            assert!(!is_valid_segment(name), "{name:?}");
        }
        assert!(is_valid_segment("cover"));
        assert!(is_valid_segment("VO_0001.front"));
    }
}
