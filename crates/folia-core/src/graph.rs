//! Graph Extractor
//!
//! Flattens the resolved triples into named edges and keeps one node summary
//! per materialized entity. Graph-shape queries only read this projection.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::catalog::Catalog;
use crate::materialize::Materialized;
use crate::model::{EntityKind, EntityRecord};

/// Kinds that appear as graph nodes.
pub const GRAPH_KINDS: [EntityKind; 12] = [
    EntityKind::Work,
    EntityKind::Expression,
    EntityKind::Manifestation,
    EntityKind::ManifestationVolume,
    EntityKind::Item,
    EntityKind::Page,
    EntityKind::Person,
    EntityKind::Institution,
    EntityKind::PhysicalObject,
    EntityKind::VisualObject,
    EntityKind::Event,
    EntityKind::AbstractCharacter,
];

/// Relation placing a visual object on a page.
pub const PAGE_CONTAINS_VISUAL_OBJECT: &str = "page_contains_visual_object";

/// One resolved triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub name: String,
    pub source: String,
    pub target: String,
}

/// Node summary emitted by graph queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub title: String,
    pub entity_type: EntityKind,
    pub projects: Vec<String>,
}

impl GraphNode {
    fn from_record(record: &EntityRecord, catalog: &Catalog) -> Self {
        let title = match record.kind {
            EntityKind::Item => record.card_title().to_string(),
            kind => record
                .public_value(kind.title_key())
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
        };
        Self {
            id: record.id.clone(),
            label: catalog.label_or(&record.id, ""),
            title,
            entity_type: record.kind,
            projects: record.projects.clone(),
        }
    }

    pub fn in_any(&self, projects: &[String]) -> bool {
        self.projects.iter().any(|p| projects.contains(p))
    }
}

/// Edges plus node summaries for the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct GraphProjection {
    pub edges: Vec<GraphEdge>,
    nodes: HashMap<String, GraphNode>,
    visual_object_pages: HashMap<String, String>,
}

impl GraphProjection {
    pub fn build(catalog: &Catalog, out: &Materialized) -> Self {
        let edges: Vec<GraphEdge> = catalog
            .triples
            .iter()
            .map(|t| GraphEdge {
                name: t.relation.clone(),
                source: t.subject.clone(),
                target: t.object.clone(),
            })
            .collect();

        let mut nodes = HashMap::new();
        for kind in GRAPH_KINDS {
            for record in out.records(kind) {
                nodes.insert(record.id.clone(), GraphNode::from_record(record, catalog));
            }
        }

        // Last placement wins when a visual object sits on several pages.
        let visual_object_pages = edges
            .iter()
            .filter(|e| e.name == PAGE_CONTAINS_VISUAL_OBJECT)
            .map(|e| (e.target.clone(), e.source.clone()))
            .collect();

        debug!(edges = edges.len(), nodes = nodes.len(), "Prepared graph projection");
        Self {
            edges,
            nodes,
            visual_object_pages,
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        self.nodes.get(id).map(|n| n.entity_type)
    }

    /// Page holding a visual object.
    pub fn page_of(&self, visual_object: &str) -> Option<&str> {
        self.visual_object_pages.get(visual_object).map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexContext;
    use crate::materialize::fixtures::Fixture;
    use crate::materialize::{materialize_all, Lookups};

    #[test]
    fn nodes_carry_titles_and_pages_are_indexed() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Work, "w1", "w_1", None)
            .doc(EntityKind::Person, "p1", "p_1", None)
            .doc(EntityKind::Page, "g1", "g_1", Some("PAG_1"))
            .doc(EntityKind::VisualObject, "v1", "v_1", Some("VO_PAG_1"))
            .attr("w1", "work_has_uniform_title", "Rime")
            .attr("p1", "person_has_name", "Pietro Bembo")
            .rel("w1", "work_authored_by", "p1")
            .rel("g1", "page_contains_visual_object", "v1");
        let index = IndexContext::build(&fx.catalog);
        let out = materialize_all(Lookups::new(&fx.catalog, &index));
        let graph = GraphProjection::build(&fx.catalog, &out);

        assert!(graph.edges.iter().any(|e| e.name == "work_authored_by"));
        assert_eq!(graph.node("w1").map(|n| n.title.as_str()), Some("Rime"));
        assert_eq!(graph.node("p1").map(|n| n.label.as_str()), Some("p_1"));
        assert_eq!(graph.kind_of("p1"), Some(EntityKind::Person));
        assert_eq!(graph.page_of("v1"), Some("g1"));
        assert!(graph.node("w1:work_has_uniform_title:Rime").is_none());
    }
}
