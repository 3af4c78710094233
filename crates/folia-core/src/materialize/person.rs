use serde_json::{json, Value};

use super::{json_map, Deduplicator, Lookups};
use crate::dates::{person_year, YearSpan};
use crate::index::{ListSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet};

pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Person);

    for doc in lookups.catalog.documents(EntityKind::Person) {
        let id = doc.id.as_str();
        let Some(name) = index.text(TextSlot::PersonName, id) else {
            continue;
        };

        let aliases = index.list(ListSlot::PersonAlias, id);
        let roles: Vec<String> = index
            .person_roles(id)
            .map(|roles| roles.keys().cloned().collect())
            .unwrap_or_default();
        let gender = index.text(TextSlot::PersonGender, id).unwrap_or_default();

        let birth_date = index.text(TextSlot::PersonBirthDate, id);
        let death_date = index.text(TextSlot::PersonDeathDate, id);
        let birth_notes = index.text(TextSlot::PersonBirthDateNotes, id);
        let death_notes = index.text(TextSlot::PersonDeathDateNotes, id);
        let (birth_year, birth_era) = person_year(birth_date, birth_notes.unwrap_or_default());
        let (death_year, death_era) = person_year(death_date, death_notes.unwrap_or_default());

        let mut record = EntityRecord::new(EntityKind::Person, id, name);
        record.human_readable_id = lookups.code(doc, EntityKind::Person);
        record.projects = lookups.projects(id);
        record.span = YearSpan::new(birth_year, death_year);
        record.card = json_map(json!({
            "name": name,
            "birth_date": birth_date,
            "birth_date_notes": birth_notes,
            "death_date": death_date,
            "death_date_notes": death_notes,
            "projects": record.projects,
        }));
        record.add_terms(Facet::PersonName, std::iter::once(name).chain(aliases.iter().map(String::as_str)));
        record.add_terms(Facet::Roles, &roles);
        record.add_terms(Facet::Gender, [gender]);

        record.set("hypotheses", lookups.hypotheses(id));
        record.set("roles", roles);
        record.set("gender", gender);
        record.set("birth_year", birth_year.map(Value::from).unwrap_or(Value::Null));
        record.set("death_year", death_year.map(Value::from).unwrap_or(Value::Null));
        record.set("birth_era", birth_era.as_str());
        record.set("death_era", death_era.as_str());

        let entry = DetailEntry::new(EntityKind::Person, record.projects.clone())
            .with_field("person_name", name)
            .with_roles();
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

    fn build(fx: &Fixture) -> Materialized {
        let index = IndexContext::build(&fx.catalog);
        let mut out = Materialized::new();
        out.absorb(materialize(Lookups::new(&fx.catalog, &index)));
        out
    }

    #[test]
    fn bc_notes_negate_years() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Person, "p1", "p_1", Some("p_1"))
            .attr("p1", "person_has_name", "Publius Vergilius Maro")
            .attr("p1", "person_has_birth_date", "70")
            .attr("p1", "person_has_birth_date_notes", "70 BC")
            .attr("p1", "person_has_death_date", "19")
            .attr("p1", "person_has_death_date_notes", "19 a.C.");
        let out = build(&fx);
        let person = &out.records(EntityKind::Person)[0];
        assert_eq!(person.get("birth_year"), Some(&json!(-70)));
        assert_eq!(person.get("death_year"), Some(&json!(-19)));
        assert_eq!(person.get_str("birth_era"), Some("BC"));
        assert_eq!(person.span, YearSpan::new(Some(-70), Some(-19)));
    }

    #[test]
    fn roles_and_aliases_become_facets() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Person, "p1", "p_1", None)
            .doc(EntityKind::Work, "w1", "w_1", None)
            .attr("p1", "person_has_name", "Dante Alighieri")
            .attr("p1", "person_has_alias", "Durante")
            .rel("w1", "work_authored_by", "p1");
        let out = build(&fx);
        let person = &out.records(EntityKind::Person)[0];
        assert!(person.facet(Facet::PersonName).is_some_and(|t| t.contains("durante")));
        assert_eq!(person.get_strings("roles"), vec!["Autore dell’opera"]);
        assert_eq!(person.card["birth_date"], Value::Null);
    }

    #[test]
    fn unnamed_persons_are_dropped() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Person, "p1", "Someone", None);
        assert!(build(&fx).records(EntityKind::Person).is_empty());
    }
}
