//! Compact entity views for relationship lists.
//!
//! Detail pages list related entities with a label and a card. The label
//! prefers the materialized title, then the indexed name, then the raw label;
//! the card starts from the entity's hypotheses and takes the materialized
//! card when there is one.

use serde_json::{json, Map, Value};

use crate::index::TextSlot;
use crate::materialize::{Lookups, Materialized};
use crate::model::{EntityKind, MinimalEntity};

/// Builds [`MinimalEntity`] views from the materialized records.
#[derive(Clone, Copy)]
pub struct MinimalResolver<'a> {
    lookups: Lookups<'a>,
    out: &'a Materialized,
}

impl<'a> MinimalResolver<'a> {
    pub fn new(lookups: Lookups<'a>, out: &'a Materialized) -> Self {
        Self { lookups, out }
    }

    pub fn kind(&self, id: &str) -> Option<EntityKind> {
        self.lookups.kind(id)
    }

    pub fn entity(&self, id: &str) -> MinimalEntity {
        let index = self.lookups.index;
        let kind = self.kind(id);
        let raw_label = self.lookups.label_or(id, "Unknown");

        let mut card = Map::new();
        card.insert("hypotheses".into(), self.lookups.hypotheses(id));

        let indexed = |slot: TextSlot| index.text(slot, id).map(str::to_string);
        let (type_name, label) = match kind {
            Some(
                kind @ (EntityKind::Work
                | EntityKind::Expression
                | EntityKind::Manifestation
                | EntityKind::ManifestationVolume
                | EntityKind::Item),
            ) => {
                let record = self.out.get(kind, id);
                if let Some(record) = record {
                    card.extend(record.card.clone());
                }
                (kind.as_str(), record.map(|r| r.label.clone()))
            }
            Some(EntityKind::Person) => {
                let name = indexed(TextSlot::PersonName).unwrap_or_else(|| raw_label.clone());
                card.insert("name".into(), name.clone().into());
                card.insert("birth_date".into(), json!(index.text(TextSlot::PersonBirthDate, id)));
                card.insert("death_date".into(), json!(index.text(TextSlot::PersonDeathDate, id)));
                card.insert("projects".into(), json!(self.lookups.catalog.projects(id)));
                ("person", Some(name))
            }
            Some(EntityKind::Institution) => ("institution", indexed(TextSlot::InstitutionName)),
            Some(EntityKind::Event) => ("event", indexed(TextSlot::EventName)),
            Some(EntityKind::Hypothesis) => ("hypothesis", None),
            Some(EntityKind::AbstractCharacter) => ("abstract_character", indexed(TextSlot::AbstractCharacterName)),
            Some(EntityKind::Place) => ("place", indexed(TextSlot::PlaceName)),
            Some(EntityKind::VisualObject) => {
                self.extend_card(EntityKind::VisualObject, id, &mut card);
                ("visual_object", indexed(TextSlot::VisualObjectName))
            }
            Some(EntityKind::Page) => {
                if let Some(digital) = index.digital_page(id) {
                    card.insert("digital_page".into(), Value::String(digital.to_string()));
                }
                self.extend_card(EntityKind::Page, id, &mut card);
                ("page", indexed(TextSlot::PageName))
            }
            Some(EntityKind::PhysicalObject) => {
                self.extend_card(EntityKind::PhysicalObject, id, &mut card);
                ("physical_object", indexed(TextSlot::PhysicalObjectName))
            }
            Some(EntityKind::Type) | None => ("other", None),
        };

        MinimalEntity {
            id: id.to_string(),
            kind: type_name.to_string(),
            label: label.unwrap_or(raw_label),
            card,
        }
    }

    fn extend_card(&self, kind: EntityKind, id: &str, card: &mut Map<String, Value>) {
        if let Some(record) = self.out.get(kind, id) {
            card.extend(record.card.clone());
        }
    }

    /// View of a raw attribute value.
    pub fn literal(&self, id: &str) -> MinimalEntity {
        MinimalEntity {
            id: id.to_string(),
            kind: "literal".to_string(),
            label: self.lookups.label_or(id, ""),
            card: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexContext;
    use crate::materialize::fixtures::Fixture;
    use crate::materialize::materialize_all;

    #[test]
    fn works_use_their_materialized_title_and_card() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Work, "w1", "w_1", Some("w_1"))
            .doc(EntityKind::Person, "p1", "p_1", None)
            .attr("w1", "work_has_uniform_title", "Commedia")
            .attr("p1", "person_has_name", "Dante")
            .attr("p1", "person_has_birth_date", "1265");
        let index = IndexContext::build(&fx.catalog);
        let lookups = Lookups::new(&fx.catalog, &index);
        let out = materialize_all(lookups);
        let resolver = MinimalResolver::new(lookups, &out);

        let work = resolver.entity("w1");
        assert_eq!(work.kind, "work");
        assert_eq!(work.label, "Commedia");
        assert_eq!(work.card["title"], json!("Commedia"));
        assert_eq!(work.card["hypotheses"], json!([]));

        let person = resolver.entity("p1");
        assert_eq!(person.label, "Dante");
        assert_eq!(person.card["birth_date"], json!("1265"));

        let unknown = resolver.entity("nope");
        assert_eq!(unknown.kind, "other");
        assert_eq!(unknown.label, "Unknown");
    }
}
