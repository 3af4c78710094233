use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

use super::{contributor_names, sorted_unique, Deduplicator, Lookups, Materialized};
use crate::index::{LinkSlot, ListSlot, ParentSlot, TextSlot};
use crate::model::{
    DetailEntry, EntityKind, EntityRecord, Facet, StructuralPosition, Transcription, VisualObjectPosition,
};
use crate::tables::normalize_language;

const SNIPPET_CHARS: usize = 100;

/// Facets copied from the parent item.
const INHERITED_FACETS: [Facet; 6] = [
    Facet::WorkTitle,
    Facet::AuthorSearchTerms,
    Facet::Classifications,
    Facet::TypeOfExpression,
    Facet::Language,
    Facet::PublicationPlace,
];

/// Payload copied from the parent item.
const INHERITED: [&str; 8] = [
    "work_title",
    "authors",
    "classifications",
    "type_of_expression",
    "language",
    "publication_place",
    "publication_start_year",
    "publication_end_year",
];

/// First hundred characters of a transcription, ellipsized.
pub(super) fn snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_CHARS {
        let head: String = text.chars().take(SNIPPET_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// 1-based position of a visual object among its page's visual objects,
/// ordered by id.
fn page_counter(lookups: &Lookups<'_>, page: &str, vo: &str) -> Option<usize> {
    sorted_unique(lookups.index.links(LinkSlot::PageVisualObjects, page))
        .iter()
        .position(|id| id == vo)
        .map(|i| i + 1)
}

fn item_title(item: Option<&EntityRecord>) -> Value {
    Value::String(item.map(|i| i.card_title().to_string()).unwrap_or_else(|| "Unknown Item".to_string()))
}

/// Container fields shown on the card, chosen by the code prefix.
fn container_fields(
    lookups: &Lookups<'_>,
    out: &Materialized,
    position: VisualObjectPosition,
    page: Option<&str>,
    item: Option<&EntityRecord>,
    transcription: &str,
    card: &mut Map<String, Value>,
) {
    let index = lookups.index;
    let page_name = |page: &str| {
        index
            .text(TextSlot::PageName, page)
            .unwrap_or("Unknown Page")
            .to_string()
    };
    match position {
        VisualObjectPosition::OnPhysicalObjectPage => {
            if let Some(page) = page {
                card.insert("Page:".into(), page_name(page).into());
                let types = index
                    .parent(ParentSlot::PagePhysicalObjectParent, page)
                    .map(|po| sorted_unique(index.list(ListSlot::PhysicalObjectType, po)))
                    .unwrap_or_default();
                if !types.is_empty() {
                    card.insert("Unità materiale:".into(), types.join(", ").into());
                }
            }
            if item.is_some() {
                card.insert("Esemplare:".into(), item_title(item));
            }
            card.insert("Transcription:".into(), snippet(transcription).into());
        }
        VisualObjectPosition::OnManifestationPage => {
            if let Some(page) = page {
                card.insert("Page:".into(), page_name(page).into());
                let volume = index
                    .parent(ParentSlot::PageVolume, page)
                    .and_then(|v| out.get(EntityKind::ManifestationVolume, v));
                let manifestation = index
                    .parent(ParentSlot::PageManifestation, page)
                    .and_then(|m| out.get(EntityKind::Manifestation, m));
                if let Some(parent) = volume.or(manifestation) {
                    card.insert("Manifestazione:".into(), parent.label.clone().into());
                }
            }
            card.insert("Transcription:".into(), snippet(transcription).into());
        }
        VisualObjectPosition::OnPage => {
            if let Some(page) = page {
                card.insert("Page:".into(), page_name(page).into());
            }
            if item.is_some() {
                card.insert("Esemplare:".into(), item_title(item));
            }
            card.insert("Transcription:".into(), snippet(transcription).into());
        }
        VisualObjectPosition::Other => {
            card.insert("transcription_snippet".into(), snippet(transcription).into());
        }
    }
}

pub(super) fn materialize(lookups: Lookups<'_>, out: &Materialized) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::VisualObject);

    for doc in lookups.catalog.documents(EntityKind::VisualObject) {
        let id = doc.id.as_str();
        let Some(code) = lookups.code(doc, EntityKind::VisualObject) else {
            continue;
        };
        let position = VisualObjectPosition::from_code(&code);

        let page = index.parent(ParentSlot::VisualObjectPage, id);
        let page_title = page
            .and_then(|p| index.text(TextSlot::PageName, p))
            .map(|name| format!("Pagina {name}"));
        let digital_page = page.and_then(|p| index.digital_page(p));
        let digitized = page.is_some_and(|p| index.is_digitized(p));

        let item = index
            .parent(ParentSlot::VisualObjectItem, id)
            .and_then(|i| out.get(EntityKind::Item, i));
        let item_owner = item.map(|i| i.get_strings("owner")).unwrap_or_default();

        let transcription = index.text_or_empty(TextSlot::VisualObjectTranscription, id);
        let name = match page.and_then(|p| page_counter(&lookups, p, id)) {
            Some(counter) => format!("Unità visuale {counter} - {code}"),
            None => lookups.text_or_label(TextSlot::VisualObjectName, id, "Unknown Visual Object"),
        };

        let mut record = EntityRecord::new(EntityKind::VisualObject, id, name.clone());
        record.human_readable_id = Some(code.clone());
        record.projects = lookups.projects_unless_unknown(id, item);
        record.position = Some(StructuralPosition::VisualObject(position));
        if let Some(item) = item {
            record.span = item.span;
            record.inherit_facets(item, &INHERITED_FACETS);
        }

        let mut card = Map::new();
        card.insert("title".into(), name.clone().into());
        card.insert("projects".into(), json!(record.projects));
        card.insert("human_readable_id".into(), code.clone().into());
        container_fields(&lookups, out, position, page, item, &transcription, &mut card);
        record.card = card;

        let types = sorted_unique(index.list(ListSlot::VisualObjectType, id));
        let functions = sorted_unique(index.list(ListSlot::VisualObjectFunction, id));
        let languages: Vec<String> = sorted_unique(index.list(ListSlot::VisualObjectLanguage, id))
            .iter()
            .map(|l| normalize_language(l))
            .collect();
        let instruments = sorted_unique(index.list(ListSlot::VisualObjectInstrument, id));
        let colours = sorted_unique(index.list(ListSlot::VisualObjectColour, id));
        let qualities = sorted_unique(index.list(ListSlot::VisualObjectTranscriptionQuality, id));

        let owners = lookups.resolve_names(index.links(LinkSlot::VisualObjectOwners, id));
        let inscribers = lookups.resolve_names(index.links(LinkSlot::VisualObjectInscribers, id));
        let senders = lookups.resolve_names(index.links(LinkSlot::VisualObjectSenders, id));
        let recipients = lookups.resolve_names(index.links(LinkSlot::VisualObjectRecipients, id));

        let mut people: BTreeSet<String> = BTreeSet::new();
        for names in [&owners, &inscribers, &senders, &recipients, &item_owner] {
            people.extend(names.iter().cloned());
        }
        if let Some(authors) = item.and_then(|i| i.get("authors")).and_then(Value::as_array) {
            people.extend(contributor_names(authors));
        }

        record.add_terms(Facet::TypeOfVisualObject, &types);
        record.add_terms(Facet::VisualObjectFunction, &functions);
        record.add_terms(Facet::VisualObjectLanguage, &languages);
        record.add_terms(Facet::VisualObjectInstrument, &instruments);
        record.add_terms(Facet::VisualObjectColour, &colours);
        record.add_terms(Facet::TranscriptionQuality, &qualities);
        record.add_terms(Facet::VisualObjectOwners, &owners);
        record.add_terms(Facet::VisualObjectInscribers, &inscribers);
        record.add_terms(Facet::VisualObjectSenders, &senders);
        record.add_terms(Facet::VisualObjectRecipients, &recipients);
        record.add_terms(Facet::ItemOwner, &item_owner);
        record.add_terms(Facet::AllPeopleAndInstitutions, &people);
        record.transcription = Some(Transcription::new(&transcription));

        record.set("page_title", page_title.clone());
        record.set("digital_page", digital_page);
        record.set("hypotheses", lookups.hypotheses(id));
        record.set("type_of_visual_object", types);
        record.set("visual_object_function", functions);
        record.set("visual_object_language", languages);
        record.set("visual_object_instrument", instruments);
        record.set("visual_object_colour", colours);
        record.set("transcription_quality", qualities);
        record.set("visual_object_owners", owners);
        record.set("visual_object_inscribers", inscribers);
        record.set("visual_object_senders", senders);
        record.set("visual_object_recipients", recipients);
        record.set("has_digital_representation", digitized);
        record.inherit_payload(item, &INHERITED);
        if item.is_none() {
            for key in ["authors", "classifications", "type_of_expression", "language"] {
                record.set(key, json!([]));
            }
        }
        record.set("item_owner", item_owner);
        record.set("all_people_and_institutions", people.into_iter().collect::<Vec<_>>());

        let entry = DetailEntry::new(EntityKind::VisualObject, record.projects.clone())
            .with_field("vo_name", name)
            .with_field("page_title", page_title)
            .with_field("digital_page", digital_page)
            .with_groups();
        dedup.offer(record, entry);
    }
    dedup
}
