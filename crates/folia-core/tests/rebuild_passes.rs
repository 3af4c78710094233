//! Rebuild passes run end to end over a small raw dataset.
//!
//! These exercise the public pass functions in the order the pipeline calls
//! them, starting from raw documents rather than test fixtures.

use std::sync::Arc;

use folia_core::{
    build_filter_options, materialize_all, populate_relationships, propagate_ancestors, Catalog,
    CoreError, EntityKind, GraphProjection, IndexContext, Lookups, Materialized, RawDataset,
    RawDocument, RawRelation, RawRelationType, RawUser, Snapshot, SnapshotStore, ALL_PROJECTS,
};
use serde_json::Value;

#[derive(Default)]
struct DatasetBuilder {
    dataset: RawDataset,
    next_relation: usize,
}

impl DatasetBuilder {
    fn new() -> Self {
        let mut builder = Self::default();
        builder.dataset.users.push(RawUser {
            id: "u1".into(),
            username: Some("alpha".into()),
        });
        builder
    }

    fn doc(&mut self, kind: EntityKind, id: &str, code: &str) -> &mut Self {
        let mut doc = RawDocument::new(id);
        doc.description = Some(Value::String(code.to_string()));
        doc.associated_users = vec!["u1".into()];
        self.dataset.push_document(kind, doc);
        self
    }

    fn inactive(&mut self, kind: EntityKind, id: &str) -> &mut Self {
        let mut doc = RawDocument::new(id);
        doc.active = false;
        self.dataset.push_document(kind, doc);
        self
    }

    fn rel(&mut self, subject: &str, relation: &str, object: &str) -> &mut Self {
        let type_id = format!("t:{relation}");
        if !self.dataset.relation_types.iter().any(|t| t.id == type_id) {
            self.dataset.relation_types.push(RawRelationType {
                id: type_id.clone(),
                active: true,
                name: Some(relation.to_string()),
            });
        }
        self.next_relation += 1;
        self.dataset.relations.push(RawRelation {
            id: format!("r{}", self.next_relation),
            active: true,
            entity1: Some(subject.to_string()),
            entity2: Some(object.to_string()),
            relation_type: Some(type_id),
        });
        self
    }

    fn attr(&mut self, subject: &str, relation: &str, value: &str) -> &mut Self {
        let value_id = format!("{subject}/{relation}");
        let mut doc = RawDocument::new(&value_id);
        doc.label = Some(Value::String(value.to_string()));
        self.dataset.push_document(EntityKind::Type, doc);
        self.rel(subject, relation, &value_id)
    }

    fn catalog(&self) -> Catalog {
        Catalog::build(self.dataset.clone())
    }
}

fn library() -> DatasetBuilder {
    let mut b = DatasetBuilder::new();
    b.doc(EntityKind::Work, "w1", "w_0001")
        .doc(EntityKind::Work, "w2", "w_0001")
        .doc(EntityKind::Work, "w3", "w_0003")
        .doc(EntityKind::Person, "p1", "p_0001")
        .doc(EntityKind::Expression, "e1", "ex_0001")
        .doc(EntityKind::Expression, "e3", "ex_0003")
        .doc(EntityKind::Manifestation, "m1", "m_0001")
        .doc(EntityKind::Item, "i1", "i_0001")
        .inactive(EntityKind::Work, "w9")
        .attr("w1", "work_has_uniform_title", "Asolani")
        .attr("w2", "work_has_uniform_title", "Asolani")
        .attr("p1", "person_has_name", "Pietro Bembo")
        .rel("w2", "work_authored_by", "p1")
        .rel("w9", "work_authored_by", "p1")
        .rel("e1", "is_expression_of_work", "w1")
        .rel("e3", "is_expression_of_work", "w3")
        .rel("m1", "is_manifestation_of_expression", "e1")
        .attr("m1", "manifestation_has_short_title", "Gli Asolani")
        .rel("i1", "is_item_of_manifestation", "m1")
        .attr("i1", "item_has_shelf_mark", "Ald. 3");
    b
}

fn rebuild(catalog: &Catalog) -> Materialized {
    let index = IndexContext::build(catalog);
    let lookups = Lookups::new(catalog, &index);
    let mut out = materialize_all(lookups);
    populate_relationships(lookups, &mut out);
    propagate_ancestors(lookups, &mut out);
    out
}

#[test]
fn duplicates_collapse_onto_the_richer_record() {
    let catalog = library().catalog();
    let out = rebuild(&catalog);

    let works = out.records(EntityKind::Work);
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].id, "w2");

    let loser = out.details.lookup(EntityKind::Work, "w1");
    let winner = out.details.lookup(EntityKind::Work, "w2");
    assert!(matches!((loser, winner), (Some(a), Some(b)) if std::ptr::eq(a, b)));
    assert_eq!(out.get(EntityKind::Work, "w1").map(|r| r.id.as_str()), Some("w2"));
}

#[test]
fn records_without_their_defining_attribute_are_left_out() {
    let catalog = library().catalog();
    let out = rebuild(&catalog);

    assert!(out.get(EntityKind::Work, "w3").is_none());
    assert!(out.get(EntityKind::Expression, "e3").is_none());
    assert!(out.get(EntityKind::Expression, "e1").is_some());
    assert!(catalog.kind("w9").is_none());
}

#[test]
fn ancestor_injection_is_idempotent() {
    let catalog = library().catalog();
    let index = IndexContext::build(&catalog);
    let lookups = Lookups::new(&catalog, &index);
    let mut out = materialize_all(lookups);
    populate_relationships(lookups, &mut out);

    let first = propagate_ancestors(lookups, &mut out);
    let snapshot: Vec<_> = ["e1", "m1", "i1"]
        .iter()
        .map(|id| out.details.get(id).cloned())
        .collect();
    let second = propagate_ancestors(lookups, &mut out);

    assert!(first >= 3);
    assert_eq!(second, 0);
    let again: Vec<_> = ["e1", "m1", "i1"]
        .iter()
        .map(|id| out.details.get(id).cloned())
        .collect();
    assert_eq!(snapshot, again);
}

#[test]
fn filter_options_are_scoped_by_project() {
    let catalog = library().catalog();
    let out = rebuild(&catalog);
    let options = build_filter_options(&out, &catalog.all_projects());

    let alpha = options.for_project("alpha").cloned().unwrap_or_default();
    assert_eq!(alpha.get("work_titles"), Some(&vec!["Asolani".to_string()]));
    assert!(alpha.get("all_people").is_some_and(|p| p.contains(&"Pietro Bembo".to_string())));

    let all = options.for_project(ALL_PROJECTS).cloned().unwrap_or_default();
    assert_eq!(all.get("projects"), Some(&vec!["alpha".to_string()]));
    assert!(options.for_project("beta").is_none());
}

#[test]
fn published_snapshot_serves_details_and_keeps_old_readers_intact() {
    let catalog = library().catalog();
    let out = rebuild(&catalog);
    let filters = build_filter_options(&out, &catalog.all_projects());
    let graph = GraphProjection::build(&catalog, &out);

    let store = SnapshotStore::new();
    assert!(matches!(store.current(), Err(CoreError::NotReady)));

    store.publish(Snapshot::new(out, filters, graph));
    let first = store.current().expect("published");
    assert!(first.detail(EntityKind::Work, "w1").is_ok());
    assert!(matches!(
        first.detail(EntityKind::Person, "w1"),
        Err(CoreError::NotFound(_))
    ));
    assert!(first.graph().edges.iter().any(|e| e.name == "work_authored_by"));

    store.publish(Snapshot::empty());
    let second = store.current().expect("republished");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.records(EntityKind::Work).len(), 1);
    assert!(second.records(EntityKind::Work).is_empty());
}
