//! Route behavior against an in-memory snapshot.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use folia_config::HttpConfig;
use folia_core::{EntityKind, RawDataset, RawDocument, RawRelation, RawRelationType, RawUser, SnapshotStore};
use folia_pipeline::build_snapshot;
use folia_web::{build_router, AppState};

fn dataset() -> RawDataset {
    let mut dataset = RawDataset::new();
    dataset.users.push(RawUser {
        id: "u1".into(),
        username: Some("aldine".into()),
    });

    let mut work = RawDocument::new("w1");
    work.description = Some("w_0001".into());
    work.associated_users = vec!["u1".into()];
    dataset.push_document(EntityKind::Work, work);

    let mut title = RawDocument::new("t1");
    title.label = Some("Rime".into());
    dataset.push_document(EntityKind::Type, title);

    dataset.relation_types.push(RawRelationType {
        id: "rt1".into(),
        active: true,
        name: Some("work_has_uniform_title".into()),
    });
    dataset.relations.push(RawRelation {
        id: "r1".into(),
        active: true,
        entity1: Some("w1".into()),
        entity2: Some("t1".into()),
        relation_type: Some("rt1".into()),
    });
    dataset
}

fn app(ready: bool, images: &TempDir) -> Router {
    let store = Arc::new(SnapshotStore::new());
    if ready {
        let (snapshot, _) = build_snapshot(dataset());
        store.publish(snapshot);
    }
    let config = HttpConfig {
        images_dir: images.path().to_path_buf(),
        ..HttpConfig::default()
    };
    build_router(AppState::new(store, images.path()), &config)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn readiness_follows_the_store() {
    let images = TempDir::new().expect("tempdir");
    let (status, body) = get_json(app(false, &images), "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "loading_data"}));

    let (status, body) = get_json(app(true, &images), "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ready"}));

    let (_, body) = get_json(app(false, &images), "/health").await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ready"], false);
}

#[tokio::test]
async fn queries_before_first_rebuild_are_unavailable() {
    let images = TempDir::new().expect("tempdir");
    let (status, body) = post_json(app(false, &images), "/entities/search", json!({"rules": []})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "not_ready");
}

#[tokio::test]
async fn search_returns_count_and_results() {
    let images = TempDir::new().expect("tempdir");
    let query = json!({
        "entity": "work",
        "rules": [{"field": "work_title", "logic": "and", "values": ["rime"]}]
    });
    let (status, body) = post_json(app(true, &images), "/entities/search", query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["work_id"], "w1");
}

#[tokio::test]
async fn invalid_search_bodies_are_unprocessable() {
    let images = TempDir::new().expect("tempdir");
    let (status, body) = post_json(app(true, &images), "/entities/search", json!({"rules": [], "limit": 0})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = post_json(app(true, &images), "/entities/search", json!({"entity": "work"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn details_and_filters() {
    let images = TempDir::new().expect("tempdir");
    let (status, _) = get_json(app(true, &images), "/details/work/w1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(app(true, &images), "/details/work/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Work with ID 'missing' not found");

    let (status, _) = get_json(app(true, &images), "/filters/options").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(app(true, &images), "/filters/options?project=aldine").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(app(true, &images), "/filters/options?project=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn graph_search_requires_its_filter_block() {
    let images = TempDir::new().expect("tempdir");
    let (status, _) = post_json(app(true, &images), "/graphs/search", json!({"graph_type": "mentions"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let query = json!({
        "graph_type": "general",
        "general_filters": {"entity_types": ["work"], "relationships": []}
    });
    let (status, body) = post_json(app(true, &images), "/graphs/search", query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"nodes": [], "edges": []}));
}

#[tokio::test]
async fn images_are_found_by_stem() {
    let images = TempDir::new().expect("tempdir");
    std::fs::create_dir(images.path().join("aldine")).expect("mkdir");
    std::fs::write(images.path().join("aldine").join("cover.png"), b"png").expect("write");

    let request = Request::builder().uri("/images/aldine/cover").body(Body::empty()).expect("request");
    let response = app(false, &images).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");

    let (status, body) = get_json(app(false, &images), "/images/aldine/back").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Image not found");

    let (status, _) = get_json(app(false, &images), "/images/missing/cover").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
