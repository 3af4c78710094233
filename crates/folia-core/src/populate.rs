//! Relationship Populator
//!
//! Second walk over the triples. Every relation is classified once and the
//! resulting edges are appended to the detail entries of both endpoints:
//!
//! - **roles**: the actor's `roles_with_entities` map (plus `Member of` on
//!   the person side of memberships);
//! - **visual-object groups**: `grouped_relationships` on the visual object;
//! - **attributes**: one outgoing edge to a literal;
//! - **personal**: directional labels on both sides;
//! - **page containment** and **parent/child**: structural edges;
//! - everything else: a generic edge, grouped as `mention` when the name
//!   says so.
//!
//! Writes go through [`DetailCache::get_mut`], so ids that lost
//! deduplication land on the winner's entry.

use tracing::debug;

use crate::catalog::Triple;
use crate::materialize::{Lookups, Materialized};
use crate::minimal::MinimalResolver;
use crate::model::{
    DetailCache, EntityKind, PhysicalObjectPosition, RelationGroup, Relationship, StructuralPosition,
};
use crate::tables::relations::{
    is_attribute_relation, is_container_first, is_mention, is_parent_child, is_skipped_structural,
    personal_labels, role_for_relation, visual_object_group, MEMBER_OF_ROLE,
};

const MEMBERSHIP: &str = "person_member_of_institution";
const PAGE_VISUAL_OBJECT: &str = "page_contains_visual_object";
const PAGE_PHYSICAL_OBJECT: &str = "page_contains_physical_object";
const PAGE_PHYSICAL_OBJECT_PAGE: &str = "page_contains_physical_object_page";

/// Counters reported after the pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PopulateStats {
    pub added: usize,
    pub duplicates: usize,
    pub roles: usize,
    pub grouped: usize,
}

struct Populator<'a> {
    resolver: MinimalResolver<'a>,
    out: &'a Materialized,
    details: &'a mut DetailCache,
    stats: PopulateStats,
}

impl Populator<'_> {
    fn push(&mut self, owner: &str, rel: Relationship) {
        let Some(entry) = self.details.get_mut(owner) else {
            return;
        };
        if entry.add_relationship(rel) {
            self.stats.added += 1;
        } else {
            self.stats.duplicates += 1;
        }
    }

    fn outgoing(&mut self, owner: &str, relation: &str, group: RelationGroup, target: &str) {
        if self.details.contains(owner) {
            let rel = Relationship::outgoing(relation, group, self.resolver.entity(target));
            self.push(owner, rel);
        }
    }

    fn incoming(&mut self, owner: &str, relation: &str, group: RelationGroup, source: &str) {
        if self.details.contains(owner) {
            let rel = Relationship::incoming(relation, group, self.resolver.entity(source));
            self.push(owner, rel);
        }
    }

    fn role(&mut self, actor: &str, role: &str, related: &str) {
        if let Some(entry) = self.details.get_mut(actor) {
            entry.add_role(role, self.resolver.entity(related));
            self.stats.roles += 1;
        }
    }

    fn is_actor(&self, id: &str) -> bool {
        matches!(
            self.resolver.kind(id),
            Some(EntityKind::Person | EntityKind::Institution)
        )
    }

    fn apply(&mut self, triple: &Triple) {
        let (s, r, o) = (triple.subject.as_str(), triple.relation.as_str(), triple.object.as_str());

        if let Some(role) = role_for_relation(r) {
            if self.is_actor(o) {
                self.role(o, role, s);
            }
        }
        if r == MEMBERSHIP && self.resolver.kind(s) == Some(EntityKind::Person) {
            self.role(s, MEMBER_OF_ROLE, o);
        }

        if let Some(label) = visual_object_group(r) {
            let pair = if r == PAGE_VISUAL_OBJECT {
                Some((o, s))
            } else if self.resolver.kind(s) == Some(EntityKind::VisualObject) {
                Some((s, o))
            } else {
                None
            };
            if let Some((vo, other)) = pair {
                if let Some(entry) = self.details.get_mut(vo) {
                    entry.add_grouped(label, self.resolver.entity(other));
                    self.stats.grouped += 1;
                }
            }
        }

        if is_skipped_structural(r) {
            return;
        }

        if is_attribute_relation(r) {
            if self.details.contains(s) {
                let rel = Relationship::outgoing(r, RelationGroup::Other, self.resolver.literal(o));
                self.push(s, rel);
            }
            return;
        }

        if let Some((out_label, in_label)) = personal_labels(r) {
            self.outgoing(s, out_label, RelationGroup::Personal, o);
            self.incoming(o, in_label, RelationGroup::Personal, s);
            return;
        }

        match r {
            PAGE_PHYSICAL_OBJECT | PAGE_PHYSICAL_OBJECT_PAGE => {
                let page_is_contained = r == PAGE_PHYSICAL_OBJECT_PAGE;
                let page_group = if page_is_contained {
                    RelationGroup::Parent
                } else {
                    RelationGroup::Child
                };
                self.outgoing(s, r, page_group, o);

                let on_page = matches!(
                    self.out.get(EntityKind::PhysicalObject, o).and_then(|po| po.position),
                    Some(StructuralPosition::PhysicalObject(
                        PhysicalObjectPosition::OnPage | PhysicalObjectPosition::OnNestedPage
                    ))
                );
                let po_group = if page_is_contained || on_page {
                    RelationGroup::Child
                } else {
                    RelationGroup::Parent
                };
                self.incoming(o, r, po_group, s);
                return;
            }
            PAGE_VISUAL_OBJECT => {
                // The subject may also be a physical object acting as a page.
                self.outgoing(s, r, RelationGroup::Child, o);
                self.incoming(o, r, RelationGroup::Parent, s);
                return;
            }
            _ => {}
        }

        if is_parent_child(r) {
            let (subject_group, object_group) = if is_container_first(r) {
                (RelationGroup::Child, RelationGroup::Parent)
            } else {
                (RelationGroup::Parent, RelationGroup::Child)
            };
            self.outgoing(s, r, subject_group, o);
            self.incoming(o, r, object_group, s);
            return;
        }

        let group = if is_mention(r) {
            RelationGroup::Mention
        } else {
            RelationGroup::Other
        };
        self.outgoing(s, r, group, o);
        self.incoming(o, r, group, s);
    }
}

/// Append relationship edges for every triple to the detail cache.
pub fn populate_relationships(lookups: Lookups<'_>, out: &mut Materialized) -> PopulateStats {
    let mut details = std::mem::take(&mut out.details);
    let stats = {
        let view: &Materialized = out;
        let mut populator = Populator {
            resolver: MinimalResolver::new(lookups, view),
            out: view,
            details: &mut details,
            stats: PopulateStats::default(),
        };
        for triple in &lookups.catalog.triples {
            populator.apply(triple);
        }
        populator.stats
    };
    out.details = details;
    debug!(
        added = stats.added,
        duplicates = stats.duplicates,
        roles = stats.roles,
        grouped = stats.grouped,
        "Populated relationships"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexContext;
    use crate::materialize::fixtures::Fixture;
    use crate::materialize::materialize_all;
    use crate::model::Direction;

    fn run(fx: &Fixture) -> Materialized {
        let index = IndexContext::build(&fx.catalog);
        let lookups = Lookups::new(&fx.catalog, &index);
        let mut out = materialize_all(lookups);
        populate_relationships(lookups, &mut out);
        out
    }

    fn people() -> Fixture {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Person, "p1", "p_1", None)
            .doc(EntityKind::Person, "p2", "p_2", None)
            .doc(EntityKind::Institution, "in1", "inst_1", None)
            .doc(EntityKind::Work, "w1", "w_1", None)
            .attr("p1", "person_has_name", "Pietro Bembo")
            .attr("p2", "person_has_name", "Aldo Manuzio")
            .attr("in1", "institution_has_name", "Accademia")
            .attr("w1", "work_has_uniform_title", "Prose della volgar lingua")
            .rel("w1", "work_authored_by", "p1")
            .rel("p1", "person_member_of_institution", "in1")
            .rel("p2", "is_the_teacher_of", "p1");
        fx
    }

    #[test]
    fn roles_are_written_on_both_sides_of_a_membership() {
        let out = run(&people());
        let bembo = out.details.get("p1").and_then(|e| e.roles_with_entities.clone()).unwrap_or_default();
        assert_eq!(bembo["Author"][0].id, "w1");
        assert_eq!(bembo["Member of"][0].label, "Accademia");
        let academy = out.details.get("in1").and_then(|e| e.roles_with_entities.clone()).unwrap_or_default();
        assert_eq!(academy["Member"][0].id, "p1");
    }

    #[test]
    fn personal_relations_use_directional_labels() {
        let out = run(&people());
        let teacher = out.details.get("p2").map(|e| e.relationships.clone()).unwrap_or_default();
        assert!(teacher
            .iter()
            .any(|r| r.relation_type == "Is the teacher of" && r.direction == Direction::Outgoing));
        let pupil = out.details.get("p1").map(|e| e.relationships.clone()).unwrap_or_default();
        assert!(pupil.iter().any(|r| r.relation_type == "Is the student/pupil of"
            && r.group == RelationGroup::Personal
            && r.related_id == "p2"));
    }

    #[test]
    fn parent_child_edges_follow_containment() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Work, "w1", "w_1", None)
            .doc(EntityKind::Expression, "e1", "ex_1", None)
            .attr("w1", "work_has_uniform_title", "Asolani")
            .rel("e1", "is_expression_of_work", "w1")
            .rel("e1", "is_expression_of_work", "w1");
        let out = run(&fx);
        let expression = out.details.get("e1").map(|e| e.relationships.clone()).unwrap_or_default();
        assert_eq!(expression.len(), 1);
        assert_eq!(expression[0].group, RelationGroup::Parent);
        let work = out.details.get("w1").map(|e| e.relationships.clone()).unwrap_or_default();
        let child = work.iter().find(|r| r.related_id == "e1");
        assert_eq!(child.map(|r| r.group), Some(RelationGroup::Child));
        assert_eq!(child.map(|r| r.direction), Some(Direction::Incoming));
    }

    #[test]
    fn mentions_and_attributes_get_their_own_groups() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Work, "w1", "w_1", None)
            .doc(EntityKind::Work, "w2", "w_2", None)
            .attr("w1", "work_has_uniform_title", "A")
            .attr("w2", "work_has_uniform_title", "B")
            .rel("w1", "work_is_mentioning", "w2")
            .doc(EntityKind::Item, "i1", "i_1", None)
            .doc(EntityKind::Manifestation, "m1", "m_1", None)
            .attr("m1", "manifestation_has_short_title", "Rime")
            .rel("i1", "is_item_of_manifestation", "m1")
            .attr("i1", "item_has_material", "Carta");
        let out = run(&fx);
        let w2 = out.details.get("w2").map(|e| e.relationships.clone()).unwrap_or_default();
        let mention = w2.iter().find(|r| r.relation_type == "work_is_mentioning");
        assert_eq!(mention.map(|r| r.group), Some(RelationGroup::Mention));
        let item = out.details.get("i1").map(|e| e.relationships.clone()).unwrap_or_default();
        let material = item.iter().find(|r| r.relation_type == "item_has_material");
        assert_eq!(material.map(|r| r.related_type.as_str()), Some("literal"));
        assert_eq!(material.map(|r| r.related_label.as_str()), Some("Carta"));
    }

    #[test]
    fn visual_objects_group_their_page_and_roles() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Page, "g1", "g_1", Some("PAG_1"))
            .doc(EntityKind::VisualObject, "v1", "v_1", Some("VO_PAG_1"))
            .doc(EntityKind::Person, "p1", "p_1", None)
            .attr("g1", "page_has_name", "1r")
            .attr("p1", "person_has_name", "Isabella d'Este")
            .rel("g1", "page_contains_visual_object", "v1")
            .rel("v1", "visual_object_owned_by_person", "p1");
        let out = run(&fx);
        let groups = out.details.get("v1").and_then(|e| e.grouped_relationships.clone()).unwrap_or_default();
        assert_eq!(groups["Contained in Page"][0].id, "g1");
        assert_eq!(groups["Owner"][0].label, "Isabella d'Este");
        let page = out.details.get("g1").map(|e| e.relationships.clone()).unwrap_or_default();
        let contained = page.iter().find(|r| r.related_id == "v1");
        assert_eq!(contained.map(|r| r.group), Some(RelationGroup::Child));
    }
}
