use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashMap};

use super::{contributor_names, sorted_unique, ContributorStyle, Deduplicator, Lookups, Materialized};
use crate::dates::parse_date_to_range;
use crate::index::{LinkSlot, ListSlot, ParentSlot, PlaceSlot, TextSlot};
use crate::model::{
    DetailEntry, EntityKind, EntityRecord, Facet, PhysicalObjectPosition, StructuralPosition,
};
use crate::tables::vocabularies::{PHYSICAL_OBJECT_CREATOR, PHYSICAL_OBJECT_OWNER};

/// Facets copied from the parent item.
const INHERITED_FACETS: [Facet; 7] = [
    Facet::WorkTitle,
    Facet::AuthorSearchTerms,
    Facet::Classifications,
    Facet::TypeOfExpression,
    Facet::Language,
    Facet::PublicationPlace,
    Facet::Owner,
];

/// Payload copied from the parent item.
const INHERITED: [&str; 11] = [
    "authors",
    "classifications",
    "type_of_expression",
    "language",
    "publication_place",
    "publication_date",
    "publication_date_range",
    "publication_start_year",
    "publication_end_year",
    "owner",
    "work_title",
];

/// Physical object to the persons holding a role on it.
fn role_index(lookups: &Lookups<'_>, role: &str) -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for (person, objects) in lookups.index.persons_with_role(role) {
        for object in objects {
            out.entry(object.clone()).or_default().push(person.to_string());
        }
    }
    out
}

/// `types - name` of another physical object.
fn container_label(lookups: &Lookups<'_>, po: &str) -> String {
    let index = lookups.index;
    let types = index.list(ListSlot::PhysicalObjectType, po).join(", ");
    let name = index.text(TextSlot::PhysicalObjectName, po).unwrap_or("Unknown PO");
    format!("{types} - {name}")
}

fn container_fields(
    lookups: &Lookups<'_>,
    out: &Materialized,
    position: PhysicalObjectPosition,
    po: &str,
    page: Option<&str>,
    item: Option<&EntityRecord>,
    card: &mut Map<String, Value>,
) {
    let index = lookups.index;
    let item_title = |item_id: Option<&str>| {
        item_id
            .and_then(|i| out.get(EntityKind::Item, i))
            .map(|i| Value::String(i.card_title().to_string()))
    };
    let page_name = |page: &str| index.text(TextSlot::PageName, page).unwrap_or("Unknown Page").to_string();

    match position {
        PhysicalObjectPosition::OnNestedPage => {
            let Some(page) = page else { return };
            card.insert("Page name:".into(), page_name(page).into());
            let item_id = match index.parent(ParentSlot::PagePhysicalObjectParent, page) {
                Some(grandparent) => {
                    card.insert("Contenuto in:".into(), container_label(lookups, grandparent).into());
                    index.parent(ParentSlot::PhysicalObjectItem, grandparent)
                }
                None => index.parent(ParentSlot::PageItem, page),
            };
            if let Some(title) = item_title(item_id) {
                card.insert("Item:".into(), title);
            }
        }
        PhysicalObjectPosition::OnPage => {
            let Some(page) = page else { return };
            card.insert("Page name:".into(), page_name(page).into());
            let item_id = index.parent(ParentSlot::PageItem, page).or_else(|| {
                index
                    .parent(ParentSlot::PagePhysicalObjectParent, page)
                    .and_then(|parent| index.parent(ParentSlot::PhysicalObjectItem, parent))
            });
            if let Some(title) = item_title(item_id) {
                card.insert("Item:".into(), title);
            }
        }
        PhysicalObjectPosition::Independent => {
            if let Some(description) = index
                .text(TextSlot::PhysicalObjectDescription, po)
                .filter(|d| !d.is_empty())
            {
                card.insert("Descrizione:".into(), description.into());
            }
        }
        PhysicalObjectPosition::InItem => {
            if let Some(item) = item {
                card.insert("Item:".into(), item.card_title().to_string().into());
            }
        }
        PhysicalObjectPosition::Uncoded => {}
    }
}

pub(super) fn materialize(lookups: Lookups<'_>, out: &Materialized) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::PhysicalObject);
    let creators_of = role_index(&lookups, PHYSICAL_OBJECT_CREATOR);
    let owners_of = role_index(&lookups, PHYSICAL_OBJECT_OWNER);

    for doc in lookups.catalog.documents(EntityKind::PhysicalObject) {
        let id = doc.id.as_str();
        let raw_types = index.list(ListSlot::PhysicalObjectType, id);
        if raw_types.is_empty() {
            continue;
        }
        let types = sorted_unique(raw_types);
        let type_text = types.join(", ");
        let name = lookups.text_or_label(TextSlot::PhysicalObjectName, id, "Unknown PO");
        let title = format!("{type_text} - {name}");

        let item = index
            .parent(ParentSlot::PhysicalObjectItem, id)
            .and_then(|i| out.get(EntityKind::Item, i));
        let page = index.parent(ParentSlot::PhysicalObjectPage, id);

        let mut roles = [
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
        ];
        if let Some(page) = page {
            for vo in index.links(LinkSlot::PageVisualObjects, page) {
                let slots = [
                    LinkSlot::VisualObjectOwners,
                    LinkSlot::VisualObjectInscribers,
                    LinkSlot::VisualObjectSenders,
                    LinkSlot::VisualObjectRecipients,
                ];
                for (names, slot) in roles.iter_mut().zip(slots) {
                    names.extend(lookups.resolve_names(index.links(slot, vo)));
                }
            }
        }

        let no_ids = Vec::new();
        let creators = lookups.contributors(creators_of.get(id).unwrap_or(&no_ids), ContributorStyle::Full);
        let owners = lookups.contributors(owners_of.get(id).unwrap_or(&no_ids), ContributorStyle::Full);
        let place = index.place(PlaceSlot::PhysicalObject, id);
        let date = index.text(TextSlot::PhysicalObjectDate, id);
        let insertion_types = sorted_unique(index.list(ListSlot::PhysicalObjectInsertionType, id));
        let digitized = match page {
            Some(page) => index.is_digitized(page),
            None => item
                .and_then(|i| i.get("has_digital_representation"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        };

        let code = lookups.code(doc, EntityKind::PhysicalObject);
        let position = PhysicalObjectPosition::from_code(code.as_deref());

        let mut record = EntityRecord::new(EntityKind::PhysicalObject, id, title.clone());
        record.human_readable_id = code.clone();
        record.projects = lookups.projects_unless_unknown(id, item);
        record.position = Some(StructuralPosition::PhysicalObject(position));
        record.span = date.map(parse_date_to_range).unwrap_or_default();
        if let Some(item) = item {
            record.inherit_facets(item, &INHERITED_FACETS);
        }

        let mut card = Map::new();
        card.insert("title".into(), title.clone().into());
        card.insert("type_of_physical_object".into(), type_text.into());
        card.insert("projects".into(), json!(record.projects));
        card.insert("human_readable_id".into(), json!(code));
        container_fields(&lookups, out, position, id, page, item, &mut card);
        record.card = card;

        let creator_names = contributor_names(&creators);
        let owner_names = contributor_names(&owners);
        record.add_terms(Facet::TypeOfPhysicalObject, &types);
        record.add_terms(Facet::Creators, &creator_names);
        record.add_terms(Facet::Owners, &owner_names);
        record.add_terms(Facet::AllPeopleAndInstitutions, creator_names.iter().chain(&owner_names));
        if let Some(place) = place {
            record.add_terms(Facet::PhysicalObjectPlace, [&place.place_name]);
        }
        record.add_terms(Facet::InsertionType, &insertion_types);
        let [vo_owners, vo_inscribers, vo_senders, vo_recipients] = roles;
        record.add_terms(Facet::VisualObjectOwners, &vo_owners);
        record.add_terms(Facet::VisualObjectInscribers, &vo_inscribers);
        record.add_terms(Facet::VisualObjectSenders, &vo_senders);
        record.add_terms(Facet::VisualObjectRecipients, &vo_recipients);

        record.set("type_of_physical_object", types);
        record.set("creators", creators);
        record.set("owners", owners);
        record.set("hypotheses", lookups.hypotheses(id));
        record.set("place", place.and_then(|p| serde_json::to_value(p).ok()).unwrap_or(Value::Null));
        record.set("date", date);
        record.set("start_year", record.span.start);
        record.set("end_year", record.span.end);
        record.set("insertion_type", insertion_types);
        record.set("has_digital_representation", digitized);
        record.inherit_payload(item, &INHERITED);
        if item.is_none() {
            for key in ["authors", "classifications", "type_of_expression", "language", "owner"] {
                record.set(key, json!([]));
            }
        }
        record.set("visual_object_owners", json!(vo_owners));
        record.set("visual_object_inscribers", json!(vo_inscribers));
        record.set("visual_object_senders", json!(vo_senders));
        record.set("visual_object_recipients", json!(vo_recipients));

        let entry = DetailEntry::new(EntityKind::PhysicalObject, record.projects.clone())
            .with_field("po_name", title);
        dedup.offer(record, entry);
    }
    dedup
}
