//! Manifestations and their volumes.
//!
//! Both come from the manifestation collection; ids the indexer found on
//! the volume side of `manifestation_has_volume` become volumes.

use serde_json::{json, Value};

use super::{contributor_names, json_map, ContributorStyle, Deduplicator, Lookups, Materialized};
use crate::dates::parse_date_to_range;
use crate::index::{LinkSlot, ParentSlot, PlaceRef, PlaceSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet, RawDocument, NONE_PLACEHOLDER};

/// Manifestation contributor roles: index slot, payload key, facet.
const ROLES: [(LinkSlot, &str, Facet); 4] = [
    (LinkSlot::ManifestationPublishers, "publisher", Facet::Publisher),
    (LinkSlot::ManifestationEditors, "editor", Facet::Editor),
    (LinkSlot::ManifestationCorrectors, "corrector", Facet::Corrector),
    (LinkSlot::ManifestationSponsors, "sponsor", Facet::Sponsor),
];

/// Payload copied from the parent expression.
const INHERITED: [&str; 11] = [
    "authors",
    "classifications",
    "type_of_expression",
    "language",
    "translators",
    "expression_editors",
    "scriptwriters",
    "compositors",
    "reviewers",
    "other_secondary_roles",
    "author_search_terms",
];

/// Facet term for a publication place: web addresses collapse to `web`.
pub(super) fn place_term(place: &PlaceRef) -> Option<String> {
    let name = place.place_name.to_lowercase();
    if name.is_empty() {
        None
    } else if ["http://", "https://", "www."].iter().any(|p| name.starts_with(p)) {
        Some("web".to_string())
    } else {
        Some(name)
    }
}

fn place_value(place: Option<&PlaceRef>) -> Value {
    place
        .and_then(|p| serde_json::to_value(p).ok())
        .unwrap_or(Value::Null)
}

fn opt_text(value: Option<&str>) -> Value {
    value.map(|v| Value::String(v.to_string())).unwrap_or(Value::Null)
}

fn item_list(lookups: &Lookups<'_>, ids: &[String]) -> Vec<Value> {
    ids.iter()
        .map(|i| json!({"item_id": i, "item_label": lookups.label_or(i, "Unknown Item")}))
        .collect()
}

/// Returns the manifestation batch and the volume batch.
pub(super) fn materialize(lookups: Lookups<'_>, out: &Materialized) -> (Deduplicator, Deduplicator) {
    let mut manifestations = Deduplicator::new(EntityKind::Manifestation);
    let mut volumes = Deduplicator::new(EntityKind::ManifestationVolume);
    let docs = lookups.catalog.documents(EntityKind::Manifestation);

    for doc in docs {
        if lookups.index.is_volume(&doc.id) {
            if let Some((record, entry)) = volume(&lookups, out, doc) {
                volumes.offer(record, entry);
            }
        } else if let Some((record, entry)) = manifestation(&lookups, out, doc, docs) {
            manifestations.offer(record, entry);
        }
    }
    (manifestations, volumes)
}

fn volume(lookups: &Lookups<'_>, out: &Materialized, doc: &RawDocument) -> Option<(EntityRecord, DetailEntry)> {
    let index = lookups.index;
    let id = doc.id.as_str();
    let short_title = index.text(TextSlot::VolumeShortTitle, id)?;

    let parent_id = index.parent(ParentSlot::VolumeManifestation, id);
    let expression_id = parent_id.and_then(|m| index.parent(ParentSlot::ManifestationExpression, m));
    let expression = expression_id.and_then(|e| out.get(EntityKind::Expression, e));
    let work_id = expression.and_then(|e| e.get_str("work_id"));
    let authors = work_id
        .and_then(|w| out.get(EntityKind::Work, w))
        .and_then(|w| w.get("authors").cloned())
        .unwrap_or_else(|| json!([]));

    let code = lookups.code(doc, EntityKind::ManifestationVolume);
    let number = index.text(TextSlot::VolumeNumberOfVolumes, id).filter(|n| !n.is_empty());
    let number_label = number.map(|n| match &code {
        Some(c) if c.starts_with("m_vol_") => format!("Vol. {n}"),
        _ => n.to_string(),
    });
    let date = index.text(TextSlot::VolumeDate, id);
    let range = index.text(TextSlot::VolumeDateRange, id);
    let title = [
        Some(short_title),
        number_label.as_deref(),
        index.text(TextSlot::VolumeTitle, id),
        date,
    ]
    .into_iter()
    .flatten()
    .filter(|p| !p.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

    let place = place_value(index.place(PlaceSlot::Volume, id));
    let publishers = lookups.contributors(index.links(LinkSlot::VolumePublishers, id), ContributorStyle::Full);
    let editors = lookups.contributors(index.links(LinkSlot::ManifestationEditors, id), ContributorStyle::Full);
    let correctors = lookups.contributors(index.links(LinkSlot::ManifestationCorrectors, id), ContributorStyle::Full);
    let sponsors = lookups.contributors(index.links(LinkSlot::ManifestationSponsors, id), ContributorStyle::Full);

    let mut record = EntityRecord::new(EntityKind::ManifestationVolume, id, title.clone());
    record.human_readable_id = code;
    record.projects = lookups.projects_or_parent(id, expression);
    record.span = date.map(parse_date_to_range).unwrap_or_default();
    let card_date = range
        .filter(|r| !r.is_empty())
        .or(date.filter(|d| !d.is_empty()))
        .unwrap_or(NONE_PLACEHOLDER);
    record.card = json_map(json!({
        "title": title,
        "authors": authors,
        "publishers": publishers,
        "place": place,
        "date": card_date,
        "projects": record.projects,
    }));
    record.set("parent_manifestation_id", opt_text(parent_id));
    record.set("expression_id", opt_text(expression_id));
    record.set("work_id", opt_text(work_id));
    record.set("items", item_list(lookups, index.links(LinkSlot::VolumeItems, id)));
    record.set("hypotheses", lookups.hypotheses(id));
    record.set("authors", authors);
    record.set("publishers", publishers);
    record.set("editors", editors);
    record.set("correctors", correctors);
    record.set("sponsors", sponsors);
    record.set("publication_place", place);
    record.set("publication_date", opt_text(date));
    record.set("publication_date_range", opt_text(range));

    let entry = DetailEntry::new(EntityKind::ManifestationVolume, record.projects.clone())
        .with_field("manifestation_volume_title", title);
    Some((record, entry))
}

fn manifestation(
    lookups: &Lookups<'_>,
    out: &Materialized,
    doc: &RawDocument,
    docs: &[RawDocument],
) -> Option<(EntityRecord, DetailEntry)> {
    let index = lookups.index;
    let id = doc.id.as_str();
    let short_title = index.text(TextSlot::ManifestationShortTitle, id)?;

    let expression_id = index.parent(ParentSlot::ManifestationExpression, id);
    let expression = expression_id.and_then(|e| out.get(EntityKind::Expression, e));

    let place = index.place(PlaceSlot::Manifestation, id);
    let date = index.text(TextSlot::ManifestationDate, id);
    let range = index.text(TextSlot::ManifestationDateRange, id);
    let owns_volumes = index.has_links(LinkSlot::ManifestationVolumes, id);

    let mut title_parts = vec![short_title];
    if owns_volumes {
        title_parts.extend(range);
    } else {
        title_parts.extend(date);
    }
    let title = title_parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let mut record = EntityRecord::new(EntityKind::Manifestation, id, title.clone());
    record.human_readable_id = lookups.code(doc, EntityKind::Manifestation);
    record.projects = lookups.projects_or_parent(id, expression);
    record.span = date.map(parse_date_to_range).unwrap_or_default();

    if let Some(place) = place.and_then(place_term) {
        record.add_terms(Facet::PublicationPlace, [place]);
    }
    let mut role_lists = Vec::with_capacity(ROLES.len());
    for (slot, key, facet) in ROLES {
        let contributors = lookups.contributors(index.links(slot, id), ContributorStyle::Full);
        let names = contributor_names(&contributors);
        record.add_terms(facet, &names);
        record.add_terms(Facet::AllPeopleAndInstitutions, &names);
        role_lists.push((key, contributors));
    }
    if let Some(expression) = expression {
        record.inherit_facets(
            expression,
            &[
                Facet::AuthorSearchTerms,
                Facet::Classifications,
                Facet::TypeOfExpression,
                Facet::Language,
                Facet::WorkTitle,
            ],
        );
    }

    let authors = expression
        .and_then(|e| e.get("authors").cloned())
        .unwrap_or_else(|| json!([]));
    let place_json = place_value(place);
    let publishers = role_lists
        .first()
        .map(|(_, list)| list.clone())
        .unwrap_or_default();
    record.card = json_map(json!({
        "title": title,
        "authors": authors,
        "publishers": publishers,
        "place": place_json,
        "projects": record.projects,
    }));

    let volumes: Vec<Value> = index
        .links(LinkSlot::ManifestationVolumes, id)
        .iter()
        .map(|volume_id| {
            let mut entry = json!({"volume_id": volume_id});
            let code = docs
                .iter()
                .find(|d| &d.id == volume_id)
                .and_then(|d| lookups.code(d, EntityKind::ManifestationVolume));
            if let (Some(code), Some(map)) = (code, entry.as_object_mut()) {
                map.insert("human_readable_id".to_string(), Value::String(code));
            }
            if let Some(map) = entry.as_object_mut() {
                let publishers = lookups.contributors(
                    index.links(LinkSlot::VolumePublishers, volume_id),
                    ContributorStyle::Full,
                );
                map.insert("publishers".to_string(), Value::from(publishers));
                map.insert(
                    "place".to_string(),
                    place_value(index.place(PlaceSlot::Volume, volume_id)),
                );
                map.insert(
                    "date".to_string(),
                    opt_text(index.text(TextSlot::VolumeDate, volume_id)),
                );
            }
            entry
        })
        .collect();

    record.set("expression_id", opt_text(expression_id));
    record.set(
        "expression_title",
        expression.map(|e| e.label.as_str()).unwrap_or("Unknown Expression"),
    );
    record.set("work_id", expression.and_then(|e| e.get("work_id").cloned()).unwrap_or(Value::Null));
    record.set(
        "work_title",
        expression
            .and_then(|e| e.get_str("work_title"))
            .unwrap_or("Unknown Work"),
    );
    record.set("publication_place", place_json);
    record.set("publication_date", opt_text(date));
    record.set("publication_date_range", opt_text(range));
    record.set("publication_start_year", record.span.start);
    record.set("publication_end_year", record.span.end);
    record.set("items", item_list(lookups, index.links(LinkSlot::ManifestationItems, id)));
    record.set("volumes", volumes);
    for (key, contributors) in role_lists {
        record.set(key, contributors);
    }
    record.set("hypotheses", lookups.hypotheses(id));
    record.inherit_payload(expression, &INHERITED);
    if expression.is_none() {
        for key in INHERITED {
            record.set(key, json!([]));
        }
    }

    let entry = DetailEntry::new(EntityKind::Manifestation, record.projects.clone())
        .with_field("manifestation_title", title);
    Some((record, entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexContext;
    use crate::materialize::fixtures::Fixture;

    fn build(fx: &Fixture) -> Materialized {
        let index = IndexContext::build(&fx.catalog);
        let lookups = Lookups::new(&fx.catalog, &index);
        let mut out = Materialized::new();
        out.absorb(super::super::work::materialize(lookups));
        let batch = super::super::expression::materialize(lookups, &out);
        out.absorb(batch);
        let (manifestations, volumes) = materialize(lookups, &out);
        out.absorb(volumes);
        out.absorb(manifestations);
        out
    }

    fn fixture() -> Fixture {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Work, "w1", "w_1", None)
            .doc(EntityKind::Expression, "e1", "ex_1", None)
            .doc(EntityKind::Manifestation, "m1", "m_1", Some("m_1"))
            .doc(EntityKind::Manifestation, "v1", "m_vol_1", Some("m_vol_1"))
            .doc(EntityKind::Place, "l1", "loc_1", None)
            .attr("w1", "work_has_uniform_title", "Opere")
            .rel("e1", "is_expression_of_work", "w1")
            .rel("m1", "is_manifestation_of_expression", "e1")
            .attr("m1", "manifestation_has_short_title", "Opere complete")
            .attr("m1", "manifestation_has_publication_date_range", "1850-1860")
            .attr("m1", "manifestation_has_publication_date", "1850")
            .rel("m1", "manifestation_published_in_place", "l1")
            .attr("l1", "place_has_name", "www.example.org")
            .rel("m1", "manifestation_has_volume", "v1")
            .attr("v1", "manifestation_volume_has_short_title", "Opere complete")
            .attr("v1", "manifestation_volume_has_number_of_volumes", "2")
            .attr("v1", "manifestation_volume_has_publication_date", "1852");
        fx
    }

    #[test]
    fn manifestations_with_volumes_show_the_range() {
        let out = build(&fixture());
        let manifestation = &out.records(EntityKind::Manifestation)[0];
        assert_eq!(manifestation.title, "Opere complete, 1850-1860");
        assert_eq!(manifestation.get_str("work_title"), Some("Opere"));
        assert!(manifestation
            .facet(Facet::PublicationPlace)
            .is_some_and(|p| p.contains("web")));
        assert_eq!(
            manifestation.get("volumes").and_then(|v| v[0].get("human_readable_id")).cloned(),
            Some(json!("m_vol_1"))
        );
    }

    #[test]
    fn volume_titles_include_the_volume_number() {
        let out = build(&fixture());
        let volume = &out.records(EntityKind::ManifestationVolume)[0];
        assert_eq!(volume.title, "Opere complete, Vol. 2, 1852");
        assert_eq!(volume.get_str("parent_manifestation_id"), Some("m1"));
        assert_eq!(volume.card["date"], json!("1852"));
        assert_eq!(volume.span.start, Some(1852));
    }

    #[test]
    fn manifestations_without_short_title_are_dropped() {
        let mut fx = Fixture::new();
        fx.doc(EntityKind::Manifestation, "m1", "m_1", None);
        let out = build(&fx);
        assert!(out.records(EntityKind::Manifestation).is_empty());
        assert!(!out.details.contains("m1"));
    }
}
