use serde_json::{json, Value};

use super::{json_map, Deduplicator, Lookups};
use crate::index::{PlaceSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet};

pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Institution);

    for doc in lookups.catalog.documents(EntityKind::Institution) {
        let id = doc.id.as_str();
        let Some(name) = index.text(TextSlot::InstitutionName, id) else {
            continue;
        };
        let place = index.place(PlaceSlot::Institution, id);
        let place_json = place
            .and_then(|p| serde_json::to_value(p).ok())
            .unwrap_or(Value::Null);
        let roles: Vec<String> = index
            .institution_roles(id)
            .map(|roles| roles.keys().cloned().collect())
            .unwrap_or_default();

        let mut record = EntityRecord::new(EntityKind::Institution, id, name);
        record.human_readable_id = lookups.code(doc, EntityKind::Institution);
        record.projects = lookups.projects(id);
        record.card = json_map(json!({
            "name": name,
            "place": place_json,
            "projects": record.projects,
        }));
        record.add_terms(Facet::InstitutionName, [name]);
        if let Some(place) = place {
            record.add_terms(Facet::InstitutionPlace, [&place.place_name]);
        }
        record.add_terms(Facet::Roles, &roles);

        record.set("place", place_json);
        record.set("hypotheses", lookups.hypotheses(id));
        record.set("roles", roles);

        let entry = DetailEntry::new(EntityKind::Institution, record.projects.clone())
            .with_field("institution_name", name)
            .with_roles();
        dedup.offer(record, entry);
    }
    dedup
}
