use serde_json::{json, Value};

use super::{json_map, Deduplicator, Lookups};
use crate::dates::parse_date_to_range;
use crate::index::{PlaceSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet};

pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Event);

    for doc in lookups.catalog.documents(EntityKind::Event) {
        let id = doc.id.as_str();
        let Some(name) = index.text(TextSlot::EventName, id) else {
            continue;
        };
        let date = index.text(TextSlot::EventDate, id);
        let place = index
            .place(PlaceSlot::Event, id)
            .and_then(|p| serde_json::to_value(p).ok())
            .unwrap_or(Value::Null);

        let mut record = EntityRecord::new(EntityKind::Event, id, name);
        record.human_readable_id = lookups.code(doc, EntityKind::Event);
        record.projects = lookups.projects(id);
        record.span = date.map(parse_date_to_range).unwrap_or_default();
        record.card = json_map(json!({
            "event_name": name,
            "date": date,
            "place": place,
            "projects": record.projects,
        }));
        record.add_terms(Facet::EventName, [name]);

        record.set("date", date);
        record.set("place", place);
        record.set("start_year", record.span.start);
        record.set("end_year", record.span.end);
        record.set("hypotheses", lookups.hypotheses(id));

        let entry = DetailEntry::new(EntityKind::Event, record.projects.clone()).with_field("event_name", name);
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
    fn event_years_come_from_the_date() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Event, "ev1", "e_1", Some("e_1"))
            .doc(EntityKind::Event, "ev2", "e_2", None)
            .attr("ev1", "event_has_name", "Sacco di Roma")
            .attr("ev1", "event_has_date", "1527");
        let index = IndexContext::build(&fx.catalog);
        let mut out = Materialized::new();
        out.absorb(materialize(Lookups::new(&fx.catalog, &index)));
        let events = out.records(EntityKind::Event);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].get("start_year"), Some(&json!(1527)));
        assert_eq!(events[0].card["place"], Value::Null);
        assert!(!out.details.contains("ev2"));
    }
}
