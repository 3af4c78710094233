use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::{json_map, sorted_unique, Deduplicator, Lookups, Materialized};
use crate::index::{LinkSlot, ListSlot, ParentSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet, NONE_PLACEHOLDER};
use crate::tables::vocabularies::NON_ANNOTATION_TYPES;

/// Facets copied from the parent manifestation.
const INHERITED_FACETS: [Facet; 6] = [
    Facet::Classifications,
    Facet::TypeOfExpression,
    Facet::Language,
    Facet::PublicationPlace,
    Facet::WorkTitle,
    Facet::AuthorSearchTerms,
];

/// Payload copied from the parent manifestation.
const INHERITED: [&str; 8] = [
    "classifications",
    "type_of_expression",
    "language",
    "publication_place",
    "publication_date",
    "publication_date_range",
    "publication_start_year",
    "publication_end_year",
];

/// Visual-object roles collected across an item's pages.
#[derive(Default)]
struct RoleNames {
    owners: BTreeSet<String>,
    inscribers: BTreeSet<String>,
    senders: BTreeSet<String>,
    recipients: BTreeSet<String>,
}

/// What an item learns from walking its pages.
#[derive(Default)]
struct PageWalk {
    pages: Vec<(Option<i64>, Value)>,
    roles: RoleNames,
    annotated_pages: usize,
    annotation_types: BTreeMap<String, usize>,
    visual_object_types: BTreeSet<String>,
    digitized: bool,
}

fn is_annotation(kind: &str) -> bool {
    !NON_ANNOTATION_TYPES.contains(&kind.to_lowercase().as_str())
}

fn walk_pages(lookups: &Lookups<'_>, item_id: &str) -> PageWalk {
    let index = lookups.index;
    let mut walk = PageWalk::default();

    for page in index.links(LinkSlot::ItemPages, item_id) {
        let digitized = index.is_digitized(page);
        walk.digitized |= digitized;

        let visual_objects = index.links(LinkSlot::PageVisualObjects, page);
        // A visual object without a type still annotates its page.
        let annotated = visual_objects.iter().any(|vo| {
            let types = index.list(ListSlot::VisualObjectType, vo);
            types.is_empty() || types.iter().any(|t| is_annotation(t))
        });
        if annotated {
            walk.annotated_pages += 1;
        }

        let mut on_page = Vec::with_capacity(visual_objects.len());
        for vo in visual_objects {
            for kind in index.list(ListSlot::VisualObjectType, vo) {
                *walk.annotation_types.entry(kind.clone()).or_default() += 1;
                walk.visual_object_types.insert(kind.clone());
            }
            let owners = lookups.resolve_names(index.links(LinkSlot::VisualObjectOwners, vo));
            let inscribers =
                lookups.resolve_names(index.links(LinkSlot::VisualObjectInscribers, vo));
            let senders = lookups.resolve_names(index.links(LinkSlot::VisualObjectSenders, vo));
            let recipients =
                lookups.resolve_names(index.links(LinkSlot::VisualObjectRecipients, vo));
            walk.roles.owners.extend(owners.iter().cloned());
            walk.roles.inscribers.extend(inscribers.iter().cloned());
            walk.roles.senders.extend(senders.iter().cloned());
            walk.roles.recipients.extend(recipients.iter().cloned());
            let vo_name =
                lookups.text_or_label(TextSlot::VisualObjectName, vo, "Unknown Visual Object");
            on_page.push(json!({
                "vo_id": vo,
                "vo_name": vo_name,
                "owners": owners,
                "inscribers": inscribers,
                "senders": senders,
                "recipients": recipients,
            }));
        }

        let sort_key = index.sort_key(page);
        walk.pages.push((
            sort_key,
            json!({
                "page_id": page,
                "page_number_sorting": sort_key,
                "page_label": lookups.text_or_label(TextSlot::PageName, page, "Unknown Page"),
                "digital_page": index.digital_page(page),
                "has_visual_objects": !on_page.is_empty(),
                "visual_objects": on_page,
                "has_physical_objects": index.has_links(LinkSlot::PagePhysicalObjects, page),
                "has_digital_representation": digitized,
            }),
        ));
    }
    walk.pages.sort_by_key(|(key, _)| (key.is_none(), *key));
    walk
}

pub(super) fn materialize(lookups: Lookups<'_>, out: &Materialized) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Item);

    for doc in lookups.catalog.documents(EntityKind::Item) {
        let id = doc.id.as_str();
        let Some(manifestation_id) = index.parent(ParentSlot::ItemManifestation, id) else {
            continue;
        };
        if !index.has_text(TextSlot::ManifestationShortTitle, manifestation_id) {
            continue;
        }
        let manifestation = out.get(EntityKind::Manifestation, manifestation_id);
        let parent_str = |key: &str, fallback: &str| -> String {
            manifestation
                .and_then(|m| m.get_str(key))
                .unwrap_or(fallback)
                .to_string()
        };
        let manifestation_title = manifestation
            .map(|m| m.title.clone())
            .unwrap_or_else(|| "Unknown Manifestation".to_string());
        let authors = manifestation
            .and_then(|m| m.get("authors").cloned())
            .unwrap_or_else(|| json!([]));

        let shelf_mark = lookups.text_or_label(TextSlot::ItemShelfMark, id, "Unknown Item");
        let volume_number = index
            .parent(ParentSlot::ItemVolume, id)
            .and_then(|v| index.text(TextSlot::VolumeNumberOfVolumes, v))
            .filter(|n| !n.is_empty())
            .map(|n| format!("Vol. {n}"));
        let title = [
            Some(manifestation_title.as_str()),
            volume_number.as_deref(),
            Some(shelf_mark.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        let walk = walk_pages(&lookups, id);
        let physical_objects = index.links(LinkSlot::ItemPhysicalObjects, id);
        let physical_object_types: BTreeSet<String> = physical_objects
            .iter()
            .flat_map(|po| index.list(ListSlot::PhysicalObjectType, po).iter().cloned())
            .collect();
        let mut physical_object_info = format!("{} physical object(s)", physical_objects.len());
        if !physical_object_types.is_empty() {
            let types: Vec<&str> = physical_object_types.iter().map(String::as_str).collect();
            physical_object_info.push_str(&format!(": {}", types.join(", ")));
        }

        let owners = lookups.resolve_names(index.links(LinkSlot::ItemOwners, id));
        let preservation = sorted_unique(index.list(ListSlot::ItemPreservationStatus, id));
        let material = sorted_unique(index.list(ListSlot::ItemMaterial, id));
        let item_types = sorted_unique(index.list(ListSlot::ItemType, id));

        let mut record = EntityRecord::new(EntityKind::Item, id, title.clone());
        record.label = shelf_mark.clone();
        record.human_readable_id = lookups.code(doc, EntityKind::Item);
        record.projects = lookups.projects_or_parent(id, manifestation);
        if let Some(manifestation) = manifestation {
            record.span = manifestation.span;
            record.inherit_facets(manifestation, &INHERITED_FACETS);
        }

        let date = parent_str("publication_date_range", "");
        let date = if date.is_empty() {
            parent_str("publication_date", NONE_PLACEHOLDER)
        } else {
            date
        };
        record.card = json_map(json!({
            "title": title,
            "authors": authors,
            "date": date,
            "physical_object_info": physical_object_info,
            "annotated_pages_info": format!("{} of annotated page(s)", walk.annotated_pages),
            "projects": record.projects,
        }));

        let roles = &walk.roles;
        record.add_terms(Facet::PreservationStatus, &preservation);
        record.add_terms(Facet::Owner, &owners);
        record.add_terms(Facet::Material, &material);
        record.add_terms(Facet::TypeOfItem, &item_types);
        record.add_terms(Facet::VisualObjectOwners, &roles.owners);
        record.add_terms(Facet::VisualObjectInscribers, &roles.inscribers);
        record.add_terms(Facet::VisualObjectSenders, &roles.senders);
        record.add_terms(Facet::VisualObjectRecipients, &roles.recipients);
        for names in [&roles.owners, &roles.inscribers, &roles.senders, &roles.recipients] {
            record.add_terms(Facet::AllPeopleAndInstitutions, names);
        }
        record.add_terms(Facet::AllPeopleAndInstitutions, &owners);
        record.add_terms(Facet::TypeOfVisualObject, &walk.visual_object_types);
        record.add_terms(Facet::TypeOfPhysicalObject, &physical_object_types);

        let pages: Vec<Value> = walk.pages.into_iter().map(|(_, page)| page).collect();
        record.set("manifestation_id", manifestation_id);
        record.set("manifestation_title", manifestation_title);
        record.set(
            "expression_id",
            manifestation.and_then(|m| m.get("expression_id").cloned()).unwrap_or(Value::Null),
        );
        record.set("expression_title", parent_str("expression_title", "Unknown Expression"));
        record.set(
            "work_id",
            manifestation.and_then(|m| m.get("work_id").cloned()).unwrap_or(Value::Null),
        );
        record.set("work_title", parent_str("work_title", "Unknown Work"));
        record.set("authors", authors);
        record.set("physical_object_count", physical_objects.len());
        record.set("annotated_pages_count", walk.annotated_pages);
        record.set("annotation_type_counts", json!(walk.annotation_types));
        record.set("preservation_status", preservation);
        record.set("owner", owners);
        record.set("material", material);
        record.set("type_of_item", item_types);
        record.set("pages", pages.clone());
        record.set("has_digital_representation", walk.digitized);
        record.set("hypotheses", lookups.hypotheses(id));
        record.set("visual_object_owners", json!(roles.owners));
        record.set("visual_object_inscribers", json!(roles.inscribers));
        record.set("visual_object_senders", json!(roles.senders));
        record.set("visual_object_recipients", json!(roles.recipients));
        record.inherit_payload(manifestation, &INHERITED);
        if manifestation.is_none() {
            for key in ["classifications", "type_of_expression", "language"] {
                record.set(key, json!([]));
            }
        }

        let entry = DetailEntry::new(EntityKind::Item, record.projects.clone())
            .with_field("item_label", shelf_mark)
            .with_field("pages", pages);
        dedup.offer(record, entry);
    }
    dedup
}
