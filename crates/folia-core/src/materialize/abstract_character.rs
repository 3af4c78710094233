use serde_json::json;
use std::collections::BTreeSet;

use super::{json_map, Deduplicator, Lookups};
use crate::index::{LinkSlot, ListSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet};

pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::AbstractCharacter);

    for doc in lookups.catalog.documents(EntityKind::AbstractCharacter) {
        let id = doc.id.as_str();
        let Some(name) = index.text(TextSlot::AbstractCharacterName, id) else {
            continue;
        };
        let aliases = index.list(ListSlot::AbstractCharacterAlias, id);
        let mentioned_in: BTreeSet<String> = index
            .links(LinkSlot::AbstractCharacterMentionedBy, id)
            .iter()
            .filter_map(|m| lookups.kind(m))
            .map(|kind| kind.as_str().to_string())
            .collect();

        let mut record = EntityRecord::new(EntityKind::AbstractCharacter, id, name);
        record.human_readable_id = lookups.code(doc, EntityKind::AbstractCharacter);
        record.projects = lookups.projects(id);
        record.card = json_map(json!({
            "ac_name": name,
            "projects": record.projects,
        }));
        record.add_terms(Facet::AcName, std::iter::once(name).chain(aliases.iter().map(String::as_str)));
        record.set("hypotheses", lookups.hypotheses(id));
        record.mentioned_in = mentioned_in;

        let entry =
            DetailEntry::new(EntityKind::AbstractCharacter, record.projects.clone()).with_field("ac_name", name);
        dedup.offer(record, entry);
    }
    dedup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexContext;
    use crate::materialize::fixtures::Fixture;
    use crate::materialize::Materialized;

    #[test]
    fn mentions_record_the_mentioning_kinds() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::AbstractCharacter, "ac1", "ac_1", Some("ac_1"))
            .doc(EntityKind::Work, "w1", "w_1", None)
            .doc(EntityKind::Person, "p1", "p_1", None)
            .attr("ac1", "abstract_character_has_name", "Laura")
            .attr("ac1", "abstract_character_has_alias", "Madonna Laura")
            .rel("ac1", "abstract_character_is_mentioned_by", "w1")
            .rel("ac1", "abstract_character_is_mentioned_by", "p1")
            .rel("ac1", "abstract_character_is_mentioned_by", "w1");
        let index = IndexContext::build(&fx.catalog);
        let mut out = Materialized::new();
        out.absorb(materialize(Lookups::new(&fx.catalog, &index)));
        let ac = &out.records(EntityKind::AbstractCharacter)[0];
        assert_eq!(
            ac.mentioned_in.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["person", "work"]
        );
        assert!(ac.facet(Facet::AcName).is_some_and(|t| t.contains("madonna laura")));
        assert!(out.details.contains("ac1"));
    }
}
