//! Search, graph and detail queries over a snapshot built from raw documents.

use folia_core::{
    build_filter_options, materialize_all, populate_relationships, propagate_ancestors, Catalog,
    EntityKind, GraphProjection, IndexContext, Lookups, RawDataset, RawDocument, RawRelation,
    RawRelationType, RawUser, Snapshot,
};
use folia_query::request::{GeneralGraphFilter, PersonAuthorshipOwnershipFilter};
use folia_query::{
    lookup_detail, run_graph_search, run_search, FilterField, FilterRule, GraphSearchQuery,
    GraphType, Logic, Operator, OrderBy, ProximityOperator, ProximityQuery, ProximityTerm,
    QueryError, SearchQuery,
};
use proptest::prelude::*;
use serde_json::{json, Value};

#[derive(Default)]
struct DatasetBuilder {
    dataset: RawDataset,
    next_relation: usize,
}

impl DatasetBuilder {
    fn new() -> Self {
        let mut builder = Self::default();
        for (id, name) in [("u1", "alpha"), ("u2", "beta")] {
            builder.dataset.users.push(RawUser {
                id: id.into(),
                username: Some(name.into()),
            });
        }
        builder
    }

    fn doc(&mut self, kind: EntityKind, id: &str, code: &str, user: &str) -> &mut Self {
        let mut doc = RawDocument::new(id);
        doc.description = Some(Value::String(code.to_string()));
        doc.associated_users = vec![user.into()];
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

    fn snapshot(&self) -> Snapshot {
        let catalog = Catalog::build(self.dataset.clone());
        let index = IndexContext::build(&catalog);
        let lookups = Lookups::new(&catalog, &index);
        let mut out = materialize_all(lookups);
        populate_relationships(lookups, &mut out);
        propagate_ancestors(lookups, &mut out);
        let filters = build_filter_options(&out, &catalog.all_projects());
        let graph = GraphProjection::build(&catalog, &out);
        Snapshot::new(out, filters, graph)
    }
}

fn library() -> Snapshot {
    let mut b = DatasetBuilder::new();
    b.doc(EntityKind::Work, "w1", "w_0001", "u1")
        .doc(EntityKind::Work, "w2", "w_0002", "u1")
        .doc(EntityKind::Work, "w3", "w_0003", "u2")
        .doc(EntityKind::Person, "p1", "p_0001", "u1")
        .doc(EntityKind::Person, "p2", "p_0002", "u2")
        .doc(EntityKind::VisualObject, "v1", "VO_0001", "u1")
        .doc(EntityKind::VisualObject, "v2", "VO_0002", "u1")
        .attr("w1", "work_has_uniform_title", "Rime")
        .attr("w2", "work_has_uniform_title", "Asolani")
        .attr("w3", "work_has_uniform_title", "Canzoniere")
        .attr("p1", "person_has_name", "Pietro Bembo")
        .attr("p1", "person_has_birth_date", "1470")
        .attr("p1", "person_has_death_date", "1547")
        .attr("p2", "person_has_name", "Francesco Petrarca")
        .attr("p2", "person_has_birth_date", "1304")
        .attr("p2", "person_has_death_date", "1374")
        .rel("w1", "work_authored_by", "p1")
        .rel("w2", "work_authored_by", "p1")
        .rel("w3", "work_authored_by", "p2")
        .attr("v1", "visual_object_has_transcription", "the quick brown fox")
        .attr("v2", "visual_object_has_transcription", "Τοξότης");
    b.snapshot()
}

fn ids(results: &[serde_json::Map<String, Value>], key: &str) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| r.get(key).and_then(Value::as_str).map(str::to_string))
        .collect()
}

#[test]
fn author_search_returns_sorted_projected_works() {
    let snapshot = library();
    let query = SearchQuery::new(EntityKind::Work)
        .rule(FilterRule::new(FilterField::Author, Logic::And, ["pietro bembo"]));
    let response = run_search(&snapshot, &query).expect("search");

    assert_eq!(response.count, 2);
    assert_eq!(ids(&response.results, "work_title"), vec!["Asolani", "Rime"]);
    assert!(response.results.iter().all(|r| !r.contains_key("author_search_terms")));
}

#[test]
fn rules_chain_with_the_earlier_operator() {
    let snapshot = library();
    let query = SearchQuery::new(EntityKind::Work)
        .rule(FilterRule::new(FilterField::WorkTitle, Logic::Or, ["rime"]))
        .rule(FilterRule::new(FilterField::WorkTitle, Logic::Not, ["canzoniere"]))
        .rule(FilterRule::new(FilterField::Author, Logic::And, ["francesco petrarca"]));
    let response = run_search(&snapshot, &query).expect("search");
    // ({w1} ∪ {w3}) \ {w3}
    assert_eq!(ids(&response.results, "work_id"), vec!["w1"]);
}

#[test]
fn projects_restrict_the_population() {
    let snapshot = library();
    let mut query = SearchQuery::new(EntityKind::Work);
    query.projects = Some(vec!["beta".into()]);
    let response = run_search(&snapshot, &query).expect("search");
    assert_eq!(ids(&response.results, "work_id"), vec!["w3"]);
}

#[test]
fn unfiltered_searches_page_through_the_population() {
    let snapshot = library();
    let mut query = SearchQuery::new(EntityKind::Work);
    query.limit = 1;
    query.offset = 1;
    let response = run_search(&snapshot, &query).expect("search");
    assert_eq!(response.count, 3);
    assert_eq!(response.results.len(), 1);
}

#[test]
fn order_by_and_fields_shape_results() {
    let snapshot = library();
    let mut query = SearchQuery::new(EntityKind::Person)
        .rule(FilterRule::new(FilterField::PersonName, Logic::And, ["o"]).with_op(Operator::Contains));
    query.order_by = Some(OrderBy::PersonName);
    query.fields = Some(vec!["person_name".into()]);
    let response = run_search(&snapshot, &query).expect("search");

    assert_eq!(response.results.len(), 2);
    assert_eq!(
        response.results[0],
        json!({"person_id": "p2", "person_name": "Francesco Petrarca"})
            .as_object()
            .cloned()
            .unwrap_or_default()
    );
}

#[test]
fn lifespan_rules_select_people() {
    let snapshot = library();
    let query = SearchQuery::new(EntityKind::Person)
        .rule(FilterRule::new(FilterField::PersonBirthDate, Logic::Gte, ["XV"]))
        .rule(FilterRule::new(FilterField::PersonDeathDate, Logic::Lte, ["XVI century"]));
    let response = run_search(&snapshot, &query).expect("search");
    assert_eq!(ids(&response.results, "person_id"), vec!["p1"]);
    assert!(response.results.iter().all(|r| !r.contains_key("birth_year")));
}

#[test]
fn transcriptions_are_searchable_across_scripts() {
    let snapshot = library();
    let query = SearchQuery::new(EntityKind::VisualObject).rule(
        FilterRule::new(FilterField::VisualObjectTranscription, Logic::And, ["Toxotes"])
            .with_op(Operator::AnyWord),
    );
    let response = run_search(&snapshot, &query).expect("search");
    assert_eq!(ids(&response.results, "visual_object_id"), vec!["v2"]);
}

#[test]
fn proximity_search_runs_through_the_engine() {
    let snapshot = library();
    let mut proximity = ProximityQuery::new(vec![
        ProximityTerm::new("quick"),
        ProximityTerm::new("fox").with_proximity(ProximityOperator::After),
    ]);
    proximity.distance = 3;
    let query =
        SearchQuery::new(EntityKind::VisualObject).rule(FilterRule::proximity(Logic::And, proximity));
    let response = run_search(&snapshot, &query).expect("search");
    assert_eq!(ids(&response.results, "visual_object_id"), vec!["v1"]);
}

#[test]
fn invalid_queries_are_rejected() {
    let snapshot = library();
    let mut query = SearchQuery::new(EntityKind::Work);
    query.limit = 0;
    assert!(matches!(run_search(&snapshot, &query), Err(QueryError::Validation(_))));
}

#[test]
fn general_graph_pairs_edges() {
    let snapshot = library();
    let query = GraphSearchQuery {
        projects: Some(vec!["beta".into()]),
        graph_type: GraphType::General,
        general_filters: Some(GeneralGraphFilter {
            entity_types: vec!["work".into(), "person".into()],
            relationships: vec!["work_authored_by".into()],
        }),
        ..Default::default()
    };
    let response = run_graph_search(&snapshot, &query).expect("graph");

    let nodes: Vec<_> = response.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(nodes, vec!["w3", "p2"]);
    assert_eq!(response.edges.len(), 2);
    let edge = serde_json::to_value(&response.edges[0]).expect("edge json");
    assert_eq!(
        edge,
        json!({"source": "w3", "target": "p2", "type": "work_authored_by", "direction": "outgoing"})
    );
}

#[test]
fn person_graph_filters_by_name() {
    let snapshot = library();
    let query = GraphSearchQuery {
        graph_type: GraphType::PersonAuthorshipOwnership,
        person_authorship_ownership_filters: Some(PersonAuthorshipOwnershipFilter {
            person_names: Some(vec!["Pietro Bembo".into()]),
            entity_types: vec!["Work".into()],
            relationships: vec!["work_authored_by".into()],
        }),
        ..Default::default()
    };
    let response = run_graph_search(&snapshot, &query).expect("graph");
    assert_eq!(response.edges.len(), 4);
    assert!(response.nodes.iter().all(|n| n.id != "p2"));
}

#[test]
fn details_resolve_by_entity_name() {
    let snapshot = library();
    let entry = lookup_detail(&snapshot, "person", "p1").expect("detail");
    let body = serde_json::to_value(entry).expect("detail json");
    assert!(body.get("relationships").is_some());

    let err = lookup_detail(&snapshot, "work", "p1").unwrap_err();
    assert_eq!(err.to_string(), "Work with ID 'p1' not found");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pages_never_exceed_limit(limit in 1usize..5, offset in 0usize..5) {
        let snapshot = library();
        let mut query = SearchQuery::new(EntityKind::Work);
        query.limit = limit;
        query.offset = offset;
        let response = run_search(&snapshot, &query).expect("search");
        prop_assert_eq!(response.count, 3);
        prop_assert_eq!(response.results.len(), 3usize.saturating_sub(offset).min(limit));
    }
}
