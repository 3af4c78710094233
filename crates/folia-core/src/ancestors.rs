//! Ancestor Propagator
//!
//! Adds one `is_part_of_<kind>` parent edge per structural ancestor to the
//! detail entries of expressions, manifestations, volumes, items, pages,
//! physical objects and visual objects. Pages and physical objects pick their
//! chain from the structural position decoded at materialization time.
//!
//! Edges go through [`DetailEntry::add_relationship`], which drops parent
//! edges to an id already listed, so running the pass twice changes nothing.
//!
//! [`DetailEntry::add_relationship`]: crate::model::DetailEntry::add_relationship

use serde_json::Map;
use tracing::debug;

use crate::index::{IndexContext, ParentSlot, TextSlot};
use crate::materialize::{Lookups, Materialized};
use crate::model::{
    DetailCache, EntityKind, EntityRecord, MinimalEntity, PagePosition, PhysicalObjectPosition,
    RelationGroup, Relationship, StructuralPosition,
};

/// Payload keys naming a record's bibliographic parents, in injection order.
const LINEAGE: [(&str, EntityKind); 4] = [
    ("work_id", EntityKind::Work),
    ("expression_id", EntityKind::Expression),
    ("manifestation_id", EntityKind::Manifestation),
    ("parent_manifestation_id", EntityKind::Manifestation),
];

fn as_ancestor(record: &EntityRecord) -> MinimalEntity {
    MinimalEntity {
        id: record.id.clone(),
        kind: record.kind.as_str().to_string(),
        label: record.label.clone(),
        card: record.card.clone(),
    }
}

struct Chains<'a> {
    index: &'a IndexContext,
    out: &'a Materialized,
}

impl Chains<'_> {
    fn record(&self, kind: EntityKind, id: Option<&str>) -> Option<MinimalEntity> {
        id.and_then(|id| self.out.get(kind, id)).map(as_ancestor)
    }

    /// Work, expression and manifestation named in a record's payload.
    fn lineage(&self, record: &EntityRecord, chain: &mut Vec<MinimalEntity>) {
        for (key, kind) in LINEAGE {
            if let Some(ancestor) = self.record(kind, record.get_str(key)) {
                chain.push(ancestor);
            }
        }
    }

    /// A container plus its own lineage.
    fn with_lineage(&self, kind: EntityKind, id: Option<&str>, chain: &mut Vec<MinimalEntity>) {
        if let Some(record) = id.and_then(|id| self.out.get(kind, id)) {
            chain.push(as_ancestor(record));
            self.lineage(record, chain);
        }
    }

    /// The physical object a page belongs to, named even when it was not
    /// materialized.
    fn physical_object(&self, id: &str) -> MinimalEntity {
        let label = self
            .index
            .text(TextSlot::PhysicalObjectName, id)
            .unwrap_or("Unknown PO")
            .to_string();
        match self.out.get(EntityKind::PhysicalObject, id) {
            Some(record) => MinimalEntity {
                label,
                ..as_ancestor(record)
            },
            None => MinimalEntity {
                id: id.to_string(),
                kind: EntityKind::PhysicalObject.as_str().to_string(),
                label,
                card: Map::new(),
            },
        }
    }

    fn page(&self, record: &EntityRecord) -> Vec<MinimalEntity> {
        let index = self.index;
        let id = record.id.as_str();
        let mut chain = Vec::new();
        let Some(StructuralPosition::Page(position)) = record.position else {
            return chain;
        };
        match position {
            PagePosition::InNestedPhysicalObject | PagePosition::InPhysicalObject => {
                if let Some(po) = index.parent(ParentSlot::PagePhysicalObjectParent, id) {
                    chain.push(self.physical_object(po));
                    let mut item = index.parent(ParentSlot::PhysicalObjectItem, po);
                    if position == PagePosition::InPhysicalObject {
                        item = item.or_else(|| index.parent(ParentSlot::PageItem, id));
                    }
                    self.with_lineage(EntityKind::Item, item, &mut chain);
                }
            }
            PagePosition::InManifestation => self.manifestation_side(id, &mut chain),
            PagePosition::InItem => {
                self.with_lineage(EntityKind::Item, index.parent(ParentSlot::PageItem, id), &mut chain);
            }
            PagePosition::Uncoded => {}
        }
        chain
    }

    /// Volume of a manifestation-level page, else its manifestation.
    fn manifestation_side(&self, page: &str, chain: &mut Vec<MinimalEntity>) {
        let index = self.index;
        if let Some(volume) = index.parent(ParentSlot::PageVolume, page) {
            self.with_lineage(EntityKind::ManifestationVolume, Some(volume), chain);
        } else {
            let manifestation = index.parent(ParentSlot::PageManifestation, page);
            self.with_lineage(EntityKind::Manifestation, manifestation, chain);
        }
    }

    fn physical_object_chain(&self, record: &EntityRecord) -> Vec<MinimalEntity> {
        let index = self.index;
        let id = record.id.as_str();
        let mut chain = Vec::new();
        let nested = record.position
            == Some(StructuralPosition::PhysicalObject(PhysicalObjectPosition::OnNestedPage));
        if nested {
            let Some(page_id) = index.parent(ParentSlot::PhysicalObjectPage, id) else {
                return chain;
            };
            let Some(page) = self.out.get(EntityKind::Page, page_id) else {
                return chain;
            };
            chain.push(as_ancestor(page));
            let grandparent = index
                .parent(ParentSlot::PagePhysicalObjectParent, page_id)
                .and_then(|po| self.out.get(EntityKind::PhysicalObject, po));
            if let Some(grandparent) = grandparent {
                chain.push(as_ancestor(grandparent));
                let item = index.parent(ParentSlot::PhysicalObjectItem, &grandparent.id);
                self.with_lineage(EntityKind::Item, item, &mut chain);
            }
        } else {
            self.with_lineage(EntityKind::Item, index.parent(ParentSlot::PhysicalObjectItem, id), &mut chain);
        }
        chain
    }

    fn visual_object(&self, record: &EntityRecord) -> Vec<MinimalEntity> {
        let index = self.index;
        let mut chain = Vec::new();
        let Some(page_id) = index.parent(ParentSlot::VisualObjectPage, &record.id) else {
            return chain;
        };
        let Some(page) = self.out.get(EntityKind::Page, page_id) else {
            return chain;
        };
        chain.push(as_ancestor(page));
        let item = index.parent(ParentSlot::PageItem, page_id).or_else(|| {
            index
                .parent(ParentSlot::PagePhysicalObjectParent, page_id)
                .and_then(|po| index.parent(ParentSlot::PhysicalObjectItem, po))
        });
        match item {
            Some(item) => self.with_lineage(EntityKind::Item, Some(item), &mut chain),
            None => self.manifestation_side(page_id, &mut chain),
        }
        chain
    }

    fn for_record(&self, record: &EntityRecord) -> Vec<MinimalEntity> {
        match record.kind {
            EntityKind::Expression
            | EntityKind::Manifestation
            | EntityKind::ManifestationVolume
            | EntityKind::Item => {
                let mut chain = Vec::new();
                self.lineage(record, &mut chain);
                chain
            }
            EntityKind::PhysicalObject => self.physical_object_chain(record),
            EntityKind::Page => self.page(record),
            EntityKind::VisualObject => self.visual_object(record),
            _ => Vec::new(),
        }
    }
}

const HIERARCHY: [EntityKind; 7] = [
    EntityKind::Expression,
    EntityKind::Manifestation,
    EntityKind::ManifestationVolume,
    EntityKind::Item,
    EntityKind::PhysicalObject,
    EntityKind::Page,
    EntityKind::VisualObject,
];

fn inject(details: &mut DetailCache, owner: &str, chain: Vec<MinimalEntity>) -> usize {
    let Some(entry) = details.get_mut(owner) else {
        return 0;
    };
    chain
        .into_iter()
        .filter(|ancestor| {
            let relation = format!("is_part_of_{}", ancestor.kind);
            entry.add_relationship(Relationship::outgoing(relation, RelationGroup::Parent, ancestor.clone()))
        })
        .count()
}

/// Inject ancestor edges; returns how many were added.
pub fn propagate_ancestors(lookups: Lookups<'_>, out: &mut Materialized) -> usize {
    let mut details = std::mem::take(&mut out.details);
    let mut added = 0;
    {
        let view: &Materialized = out;
        let chains = Chains {
            index: lookups.index,
            out: view,
        };
        for kind in HIERARCHY {
            for record in view.records(kind) {
                added += inject(&mut details, &record.id, chains.for_record(record));
            }
        }
    }
    out.details = details;
    debug!(added, "Injected ancestor relationships");
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexContext;
    use crate::materialize::fixtures::Fixture;
    use crate::materialize::materialize_all;
    use crate::model::Direction;

    fn hierarchy() -> Fixture {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Work, "w1", "w_1", None)
            .doc(EntityKind::Expression, "e1", "ex_1", None)
            .doc(EntityKind::Manifestation, "m1", "m_1", None)
            .doc(EntityKind::Item, "i1", "i_1", None)
            .doc(EntityKind::Page, "g1", "g_1", Some("PAG_1"))
            .doc(EntityKind::VisualObject, "v1", "v_1", Some("VO_PAG_1"))
            .attr("w1", "work_has_uniform_title", "Canzoniere")
            .rel("e1", "is_expression_of_work", "w1")
            .rel("m1", "is_manifestation_of_expression", "e1")
            .attr("m1", "manifestation_has_short_title", "Le cose volgari")
            .rel("i1", "is_item_of_manifestation", "m1")
            .attr("i1", "item_has_shelf_mark", "Ald. 1501")
            .rel("i1", "item_has_page", "g1")
            .attr("g1", "page_has_name", "1r")
            .rel("g1", "page_contains_visual_object", "v1");
        fx
    }

    fn parent_kinds(out: &Materialized, id: &str) -> Vec<String> {
        out.details
            .get(id)
            .map(|e| {
                e.relationships
                    .iter()
                    .filter(|r| r.group == RelationGroup::Parent && r.direction == Direction::Outgoing)
                    .map(|r| r.relation_type.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn visual_objects_get_the_full_chain() {
        let fx = hierarchy();
        let index = IndexContext::build(&fx.catalog);
        let lookups = Lookups::new(&fx.catalog, &index);
        let mut out = materialize_all(lookups);
        propagate_ancestors(lookups, &mut out);
        assert_eq!(
            parent_kinds(&out, "v1"),
            vec![
                "is_part_of_page",
                "is_part_of_item",
                "is_part_of_work",
                "is_part_of_expression",
                "is_part_of_manifestation"
            ]
        );
        assert_eq!(parent_kinds(&out, "e1"), vec!["is_part_of_work"]);
        let item_edge = out
            .details
            .get("g1")
            .and_then(|e| e.relationships.iter().find(|r| r.relation_type == "is_part_of_item").cloned());
        assert_eq!(item_edge.map(|r| r.related_label), Some("Ald. 1501".to_string()));
    }

    #[test]
    fn running_twice_adds_nothing() {
        let fx = hierarchy();
        let index = IndexContext::build(&fx.catalog);
        let lookups = Lookups::new(&fx.catalog, &index);
        let mut out = materialize_all(lookups);
        let first = propagate_ancestors(lookups, &mut out);
        let lengths: Vec<usize> = ["e1", "m1", "i1", "g1", "v1"]
            .iter()
            .map(|id| out.details.get(id).map_or(0, |e| e.relationships.len()))
            .collect();
        let second = propagate_ancestors(lookups, &mut out);
        let again: Vec<usize> = ["e1", "m1", "i1", "g1", "v1"]
            .iter()
            .map(|id| out.details.get(id).map_or(0, |e| e.relationships.len()))
            .collect();
        assert!(first > 0);
        assert_eq!(second, 0);
        assert_eq!(lengths, again);
    }
}
