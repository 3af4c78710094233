//! Graph queries
//!
//! Three generators walk the snapshot's edge list and emit the subgraph a
//! caller asked for. Every surviving edge is emitted twice, once per
//! direction, and nodes are deduplicated by id in first-seen order.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use folia_core::model::Direction;
use folia_core::{EntityKind, GraphNode, GraphProjection, Snapshot};

use crate::error::{QueryError, QueryResult};
use crate::request::{GraphSearchQuery, GraphType};

/// Role relations from a visual object that are drawn from its page.
const PAGE_ROLE_RELATIONS: [&str; 4] = [
    "visual_object_inscribed_by",
    "visual_object_sent_by",
    "visual_object_received_by",
    "visual_object_owned_by",
];

const MENTIONING_SUFFIX: &str = "_is_mentioning";
const MENTIONED_BY_SUFFIX: &str = "_is_mentioned_by";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relation: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgeView>,
}

impl GraphResponse {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Collects nodes and paired edges.
#[derive(Default)]
struct GraphBuilder {
    seen: HashSet<String>,
    response: GraphResponse,
}

impl GraphBuilder {
    fn node(&mut self, node: GraphNode) {
        if self.seen.insert(node.id.clone()) {
            self.response.nodes.push(node);
        }
    }

    fn edge(&mut self, relation: &str, source: &str, target: &str) {
        self.response.edges.push(EdgeView {
            source: source.to_string(),
            target: target.to_string(),
            relation: relation.to_string(),
            direction: Direction::Outgoing,
        });
        self.response.edges.push(EdgeView {
            source: target.to_string(),
            target: source.to_string(),
            relation: relation.to_string(),
            direction: Direction::Incoming,
        });
    }

    fn link(&mut self, relation: &str, source: &GraphNode, target: &GraphNode) {
        self.node(source.clone());
        self.node(target.clone());
        self.edge(relation, &source.id, &target.id);
    }

    fn finish(self) -> GraphResponse {
        self.response
    }
}

/// Edge survives the project filter when either endpoint is in a project.
fn in_projects(projects: &[String], a: Option<&GraphNode>, b: Option<&GraphNode>) -> bool {
    projects.is_empty() || [a, b].into_iter().flatten().any(|n| n.in_any(projects))
}

fn kind_names(kinds: &[String]) -> BTreeSet<String> {
    kinds.iter().cloned().collect()
}

fn included(types: &BTreeSet<String>, node: Option<&GraphNode>) -> bool {
    node.is_some_and(|n| types.contains(n.entity_type.as_str()))
}

/// Run the generator selected by the query's graph type.
pub fn run_graph_search(snapshot: &Snapshot, query: &GraphSearchQuery) -> QueryResult<GraphResponse> {
    query.validate()?;
    let graph = snapshot.graph();
    let projects = query.projects.clone().unwrap_or_default();

    let response = match query.graph_type {
        GraphType::General => general(graph, query, &projects)?,
        GraphType::Mentions => mentions(graph, query, &projects)?,
        GraphType::PersonAuthorshipOwnership => {
            person_authorship_ownership(snapshot, graph, query, &projects)?
        }
    };
    debug!(
        graph_type = ?query.graph_type,
        nodes = response.nodes.len(),
        edges = response.edges.len(),
        "Graph search complete"
    );
    Ok(response)
}

fn missing(block: &str) -> QueryError {
    QueryError::validation(format!("{block} must be provided for this graph_type"))
}

fn general(graph: &GraphProjection, query: &GraphSearchQuery, projects: &[String]) -> QueryResult<GraphResponse> {
    let filters = query
        .general_filters
        .as_ref()
        .ok_or_else(|| missing("general_filters"))?;

    let mut types = kind_names(&filters.entity_types);
    if types.contains(EntityKind::Manifestation.as_str()) {
        types.insert(EntityKind::ManifestationVolume.as_str().to_string());
    }
    let relations: HashSet<&str> = filters.relationships.iter().map(String::as_str).collect();

    let mut builder = GraphBuilder::default();
    for edge in &graph.edges {
        let source = graph.node(&edge.source);
        let target = graph.node(&edge.target);
        let source_kind = source.map(|n| n.entity_type);
        let target_kind = target.map(|n| n.entity_type);

        if PAGE_ROLE_RELATIONS.contains(&edge.name.as_str()) && relations.contains(edge.name.as_str()) {
            let Some(target) = target else { continue };
            let actor = matches!(target.entity_type, EntityKind::Person | EntityKind::Institution);
            if source_kind != Some(EntityKind::VisualObject) || !actor {
                continue;
            }
            let Some(page_id) = graph.page_of(&edge.source) else {
                continue;
            };
            if !types.contains(target.entity_type.as_str()) {
                continue;
            }
            let page = graph.node(page_id);
            if !in_projects(projects, page, Some(target)) {
                continue;
            }
            let page = GraphNode {
                id: page_id.to_string(),
                label: page.map(|p| p.label.clone()).unwrap_or_default(),
                title: page.map(|p| p.title.clone()).unwrap_or_default(),
                entity_type: EntityKind::Page,
                projects: page.map(|p| p.projects.clone()).unwrap_or_default(),
            };
            builder.link(&edge.name, &page, target);
            continue;
        }

        if !relations.contains(edge.name.as_str()) {
            continue;
        }
        let structural = |kind: Option<EntityKind>| {
            matches!(kind, Some(EntityKind::Page) | Some(EntityKind::VisualObject))
        };
        if structural(source_kind) || structural(target_kind) {
            continue;
        }
        if !included(&types, source) || !included(&types, target) {
            continue;
        }
        if !in_projects(projects, source, target) {
            continue;
        }
        if let (Some(source), Some(target)) = (source, target) {
            builder.link(&edge.name, source, target);
        }
    }
    Ok(builder.finish())
}

fn mentions(graph: &GraphProjection, query: &GraphSearchQuery, projects: &[String]) -> QueryResult<GraphResponse> {
    let filters = query
        .mentions_filters
        .as_ref()
        .ok_or_else(|| missing("mentions_filters"))?;

    let mut suffixes = Vec::new();
    if filters.mention_directions.iter().any(|d| d == "Mentioning") {
        suffixes.push(MENTIONING_SUFFIX);
    }
    if filters.mention_directions.iter().any(|d| d == "Mentioned by") {
        suffixes.push(MENTIONED_BY_SUFFIX);
    }
    let types = kind_names(&filters.entity_types);

    let mut builder = GraphBuilder::default();
    for edge in &graph.edges {
        if !suffixes.iter().any(|s| edge.name.ends_with(s)) {
            continue;
        }
        let source = graph.node(&edge.source);
        let target = graph.node(&edge.target);
        if !included(&types, source) || !included(&types, target) {
            continue;
        }
        if !in_projects(projects, source, target) {
            continue;
        }
        if let (Some(source), Some(target)) = (source, target) {
            builder.link(&edge.name, source, target);
        }
    }
    Ok(builder.finish())
}

fn person_authorship_ownership(
    snapshot: &Snapshot,
    graph: &GraphProjection,
    query: &GraphSearchQuery,
    projects: &[String],
) -> QueryResult<GraphResponse> {
    let filters = query
        .person_authorship_ownership_filters
        .as_ref()
        .ok_or_else(|| missing("person_authorship_ownership_filters"))?;

    let mut types: BTreeSet<String> = filters
        .entity_types
        .iter()
        .map(|t| t.to_lowercase().replace(' ', "_"))
        .collect();
    types.insert(EntityKind::Person.as_str().to_string());
    let relations: HashSet<&str> = filters.relationships.iter().map(String::as_str).collect();

    // An empty selection, or names matching nobody, leaves persons unrestricted.
    let persons: HashSet<&str> = match &filters.person_names {
        Some(names) if !names.is_empty() => snapshot
            .records(EntityKind::Person)
            .iter()
            .filter(|p| names.contains(&p.label))
            .map(|p| p.id.as_str())
            .collect(),
        _ => HashSet::new(),
    };

    let mut builder = GraphBuilder::default();
    for edge in &graph.edges {
        if !relations.contains(edge.name.as_str()) {
            continue;
        }
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target)) else {
            continue;
        };
        let person = if source.entity_type == EntityKind::Person && included(&types, Some(target)) {
            &source.id
        } else if target.entity_type == EntityKind::Person && included(&types, Some(source)) {
            &target.id
        } else {
            continue;
        };
        if !persons.is_empty() && !persons.contains(person.as_str()) {
            continue;
        }
        if !in_projects(projects, Some(source), Some(target)) {
            continue;
        }
        builder.link(&edge.name, source, target);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_paired_and_nodes_deduplicated() {
        let node = |id: &str, kind| GraphNode {
            id: id.to_string(),
            label: id.to_string(),
            title: id.to_uppercase(),
            entity_type: kind,
            projects: vec!["alpha".to_string()],
        };
        let w1 = node("w1", EntityKind::Work);
        let p1 = node("p1", EntityKind::Person);
        let w2 = node("w2", EntityKind::Work);

        let mut builder = GraphBuilder::default();
        builder.link("work_authored_by", &w1, &p1);
        builder.link("work_authored_by", &w2, &p1);
        let response = builder.finish();

        let ids: Vec<_> = response.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "p1", "w2"]);
        assert_eq!(response.edges.len(), 4);
        assert_eq!(response.edges[1].source, "p1");
        assert_eq!(response.edges[1].direction, Direction::Incoming);
    }

    #[test]
    fn project_filter_accepts_either_endpoint() {
        let mut inside = GraphNode {
            id: "a".into(),
            label: String::new(),
            title: String::new(),
            entity_type: EntityKind::Work,
            projects: vec!["alpha".into()],
        };
        let outside = GraphNode {
            projects: vec!["beta".into()],
            ..inside.clone()
        };
        let wanted = vec!["alpha".to_string()];
        assert!(in_projects(&wanted, Some(&inside), Some(&outside)));
        inside.projects.clear();
        assert!(!in_projects(&wanted, Some(&inside), Some(&outside)));
        assert!(in_projects(&[], None, None));
    }
}
