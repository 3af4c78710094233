//! Result projection
//!
//! Public records carry a few payload values that exist only to drive
//! filtering. They are stripped before results leave the engine, and the
//! caller may narrow each result further to a list of keys.

use serde_json::{Map, Value};

use folia_core::{EntityKind, EntityRecord};

const EXPRESSION_ROLE_LISTS: [&str; 6] = [
    "translators",
    "expression_editors",
    "scriptwriters",
    "compositors",
    "reviewers",
    "other_secondary_roles",
];

/// Payload keys never returned for a kind.
pub fn hidden_keys(kind: EntityKind) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = match kind {
        EntityKind::Work => vec!["author_search_terms"],
        EntityKind::Expression => vec!["author_search_terms", "secondary_authors"],
        EntityKind::Manifestation => vec!["publication_start_year", "publication_end_year", "authors"],
        EntityKind::Item => vec![
            "publication_start_year",
            "publication_end_year",
            "visual_object_owners",
            "visual_object_inscribers",
            "visual_object_senders",
            "visual_object_recipients",
        ],
        EntityKind::Person => vec!["birth_year", "death_year", "birth_era", "death_era"],
        EntityKind::VisualObject => vec!["all_people_and_institutions"],
        EntityKind::PhysicalObject | EntityKind::Event => vec!["start_year", "end_year"],
        _ => Vec::new(),
    };
    if matches!(kind, EntityKind::Expression | EntityKind::Manifestation) {
        keys.extend(EXPRESSION_ROLE_LISTS);
    }
    keys
}

/// Public JSON of a record with hidden keys removed and, when `fields` is
/// given, only the listed keys plus the id key kept.
pub fn project(record: &EntityRecord, fields: Option<&[String]>) -> Map<String, Value> {
    let mut out = record.to_json();
    let hidden = hidden_keys(record.kind);
    out.retain(|key, _| !hidden.contains(&key.as_str()));
    if let Some(fields) = fields {
        let id_key = record.kind.id_key();
        out.retain(|key, _| *key == id_key || fields.iter().any(|f| f == key));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn person_years_are_hidden() {
        let mut person = EntityRecord::new(EntityKind::Person, "p1", "Virgil");
        person.set("birth_year", -70);
        person.set("gender", "Male");
        let out = project(&person, None);
        assert!(!out.contains_key("birth_year"));
        assert_eq!(out.get("gender"), Some(&json!("Male")));
    }

    #[test]
    fn manifestations_drop_inherited_roles() {
        let mut manifestation = EntityRecord::new(EntityKind::Manifestation, "m1", "Gli Asolani");
        manifestation.set("translators", json!([]));
        manifestation.set("publisher", json!([{"name": "Aldo"}]));
        let out = project(&manifestation, None);
        assert!(!out.contains_key("translators"));
        assert!(out.contains_key("publisher"));
    }

    #[test]
    fn fields_keep_the_id_key() {
        let mut work = EntityRecord::new(EntityKind::Work, "w1", "Rime");
        work.set("classifications", json!(["Poetry"]));
        let fields = vec!["work_title".to_string()];
        let out = project(&work, Some(&fields));
        let keys: Vec<_> = out.keys().cloned().collect();
        assert_eq!(keys, vec!["work_id", "work_title"]);
    }
}
