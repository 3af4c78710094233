//! End-to-end rebuild from an exported collection directory.

use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use folia_core::{EntityKind, SnapshotStore};
use folia_pipeline::{JsonDirSource, SnapshotPipeline};

fn write(dir: &Path, collection: &str, body: serde_json::Value) {
    let text = serde_json::to_string_pretty(&body).expect("serialize");
    std::fs::write(dir.join(format!("{collection}.json")), text).expect("write");
}

fn export(dir: &Path) {
    write(dir, "users", json!([{"_id": "u1", "username": "bembo_project"}]));
    write(
        dir,
        "works",
        json!([
            {"_id": {"$oid": "w1"}, "active": true, "description": "w_0001", "associatedUsers": ["u1"]},
            {"_id": {"$oid": "w2"}, "active": false, "description": "w_0002", "associatedUsers": ["u1"]}
        ]),
    );
    write(
        dir,
        "persons",
        json!([{"_id": "p1", "active": true, "description": "p_0001", "associatedUsers": ["u1"]}]),
    );
    write(
        dir,
        "types",
        json!([
            {"_id": "t-rime", "active": true, "label": "Rime"},
            {"_id": "t-asolani", "active": true, "label": "Asolani"},
            {"_id": "t-bembo", "active": true, "label": "Pietro Bembo"}
        ]),
    );
    write(
        dir,
        "relationtypes",
        json!([
            {"_id": "rt1", "active": true, "name": "work_has_uniform_title"},
            {"_id": "rt2", "active": true, "name": "person_has_name"},
            {"_id": "rt3", "active": true, "name": "work_authored_by"}
        ]),
    );
    write(
        dir,
        "relations",
        json!([
            {"_id": "r1", "active": true, "entity1": "w1", "entity2": "t-rime", "relationType": "rt1"},
            {"_id": "r2", "active": true, "entity1": "w2", "entity2": "t-asolani", "relationType": "rt1"},
            {"_id": "r3", "active": true, "entity1": "p1", "entity2": "t-bembo", "relationType": "rt2"},
            {"_id": "r4", "active": true, "entity1": "w1", "entity2": "p1", "relationType": "rt3"},
            {"_id": "r5", "active": true, "entity1": "w1", "entity2": null, "relationType": "rt3"}
        ]),
    );
}

#[tokio::test]
async fn rebuild_from_directory_publishes_active_records() {
    let dir = TempDir::new().expect("tempdir");
    export(dir.path());

    let store = Arc::new(SnapshotStore::new());
    let pipeline = SnapshotPipeline::new(Arc::new(JsonDirSource::new(dir.path())), Arc::clone(&store));
    let report = pipeline.rebuild().await.expect("rebuild");
    assert_eq!(report.relations, 5);

    let snapshot = store.current().expect("ready");
    let works = snapshot.records(EntityKind::Work);
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].id, "w1");
    assert_eq!(works[0].projects, vec!["bembo_project".to_string()]);

    assert!(snapshot.detail(EntityKind::Person, "p1").is_ok());
    assert!(snapshot.detail(EntityKind::Work, "w2").is_err());
    assert!(snapshot.filters().for_project("bembo_project").is_some());
}

#[tokio::test]
async fn malformed_export_keeps_the_published_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    export(dir.path());

    let store = Arc::new(SnapshotStore::new());
    let pipeline = SnapshotPipeline::new(Arc::new(JsonDirSource::new(dir.path())), Arc::clone(&store));
    pipeline.rebuild().await.expect("first rebuild");
    let first = store.current().expect("ready");

    std::fs::write(dir.path().join("persons.json"), "[{").expect("corrupt");
    assert!(pipeline.rebuild_logged().await.is_none());

    let current = store.current().expect("still ready");
    assert!(Arc::ptr_eq(&first, &current));
}
