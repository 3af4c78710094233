use serde_json::{json, Map, Value};

use super::{contributor_names, is_unknown_projects, sorted_unique, Deduplicator, Lookups, Materialized};
use crate::index::{LinkSlot, ListSlot, ParentSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, PagePosition, StructuralPosition};

/// Item owning a page: the direct link, else the item of the first
/// physical object on the page that has one.
pub(super) fn page_item<'a>(lookups: &Lookups<'a>, page: &str) -> Option<&'a str> {
    let index = lookups.index;
    index.parent(ParentSlot::PageItem, page).or_else(|| {
        index
            .links(LinkSlot::PagePhysicalObjects, page)
            .iter()
            .find_map(|po| index.parent(ParentSlot::PhysicalObjectItem, po))
    })
}

/// `types - name` of the physical object a page belongs to.
fn container_label(lookups: &Lookups<'_>, po: &str) -> String {
    let index = lookups.index;
    let types = index.list(ListSlot::PhysicalObjectType, po).join(", ");
    let name = index.text(TextSlot::PhysicalObjectName, po).unwrap_or("Unknown PO");
    format!("{types} - {name}")
}

fn publisher_line(publishers: Option<&Value>) -> Option<String> {
    let names = contributor_names(publishers?.as_array()?);
    (!names.is_empty()).then(|| names.join(", "))
}

fn card_context(
    lookups: &Lookups<'_>,
    out: &Materialized,
    position: PagePosition,
    page: &str,
    item_id: Option<&str>,
    card: &mut Map<String, Value>,
) {
    let index = lookups.index;
    let item_card = |item: Option<&str>| {
        item.and_then(|i| out.get(EntityKind::Item, i))
            .map(|i| i.card_title().to_string())
    };
    let parent_po = index.parent(ParentSlot::PagePhysicalObjectParent, page);

    match position {
        PagePosition::InNestedPhysicalObject => {
            if let Some(po) = parent_po {
                card.insert("Contenuto in:".into(), container_label(lookups, po).into());
                let item = index.parent(ParentSlot::PhysicalObjectItem, po);
                if let Some(title) = item_card(item) {
                    card.insert("Item:".into(), title.into());
                }
            }
        }
        PagePosition::InPhysicalObject => {
            if let Some(po) = parent_po {
                card.insert("Contenuto in:".into(), container_label(lookups, po).into());
            }
            let item = index
                .parent(ParentSlot::PageItem, page)
                .or_else(|| parent_po.and_then(|po| index.parent(ParentSlot::PhysicalObjectItem, po)));
            if let Some(title) = item_card(item) {
                card.insert("Item:".into(), title.into());
            }
        }
        PagePosition::InItem | PagePosition::InManifestation => {
            if item_id.is_some() {
                if let Some(title) = item_card(item_id) {
                    card.insert("Item".into(), title.into());
                }
            } else if let Some(volume) = index.parent(ParentSlot::PageVolume, page) {
                if let Some(volume) = out.get(EntityKind::ManifestationVolume, volume) {
                    card.insert("Manifestation".into(), volume.card_title().to_string().into());
                    if let Some(line) = publisher_line(volume.get("publishers")) {
                        card.insert("Publisher".into(), line.into());
                    }
                }
            } else if let Some(manifestation) = index.parent(ParentSlot::PageManifestation, page) {
                if let Some(manifestation) = out.get(EntityKind::Manifestation, manifestation) {
                    card.insert("Manifestation".into(), manifestation.card_title().to_string().into());
                    if let Some(line) = publisher_line(manifestation.get("publisher")) {
                        card.insert("Publisher".into(), line.into());
                    }
                }
            }
        }
        PagePosition::Uncoded => {}
    }
}

pub(super) fn materialize(lookups: Lookups<'_>, out: &Materialized) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Page);

    for doc in lookups.catalog.documents(EntityKind::Page) {
        let id = doc.id.as_str();
        let Some(name) = index.text(TextSlot::PageName, id).filter(|n| !n.is_empty()) else {
            continue;
        };
        let title = format!("Pagina {name}");
        let code = lookups.code(doc, EntityKind::Page);
        let position = PagePosition::from_code(code.as_deref());
        let digital_page = index.digital_page(id);
        let sort_key = index.sort_key(id);

        let item_id = page_item(&lookups, id);
        let item = item_id.and_then(|i| out.get(EntityKind::Item, i));
        let volume = index
            .parent(ParentSlot::PageVolume, id)
            .and_then(|v| out.get(EntityKind::ManifestationVolume, v));
        let manifestation = index
            .parent(ParentSlot::PageManifestation, id)
            .and_then(|m| out.get(EntityKind::Manifestation, m));

        let mut projects = lookups.projects(id);
        if is_unknown_projects(&projects) {
            if let Some(parent) = item.or(volume).or(manifestation) {
                projects = parent.projects.clone();
            }
        }

        let mut record = EntityRecord::new(EntityKind::Page, id, title.clone());
        record.human_readable_id = code;
        record.projects = projects;
        record.position = Some(StructuralPosition::Page(position));
        if let Some(item) = item {
            record.span = item.span;
        }

        let mut card = Map::new();
        card.insert("title".into(), title.clone().into());
        card.insert("projects".into(), json!(record.projects));
        let physical_object_types: Vec<String> = sorted_unique(
            &index
                .links(LinkSlot::PagePhysicalObjects, id)
                .iter()
                .flat_map(|po| index.list(ListSlot::PhysicalObjectType, po).iter().cloned())
                .collect::<Vec<_>>(),
        );
        if !physical_object_types.is_empty() {
            card.insert("Unità materiale".into(), physical_object_types.join(", ").into());
        }
        if record.human_readable_id.is_some() {
            card_context(&lookups, out, position, id, item_id, &mut card);
        }
        record.card = card;

        record.set("page_number_sorting", sort_key);
        record.set("digital_page", digital_page);

        let visual_objects: Vec<Value> = index
            .links(LinkSlot::PageVisualObjects, id)
            .iter()
            .map(|vo| {
                json!({
                    "vo_id": vo,
                    "vo_name": lookups.text_or_label(TextSlot::VisualObjectName, vo, "Unknown VO"),
                })
            })
            .collect();
        let physical_objects: Vec<Value> = index
            .links(LinkSlot::PagePhysicalObjects, id)
            .iter()
            .map(|po| {
                json!({
                    "po_id": po,
                    "po_name": lookups.text_or_label(TextSlot::PhysicalObjectName, po, "Unknown PO"),
                })
            })
            .collect();
        let entry = DetailEntry::new(EntityKind::Page, record.projects.clone())
            .with_field("page_label", title)
            .with_field("digital_page", digital_page)
            .with_field("page_number_sorting", sort_key)
            .with_field("visual_objects", visual_objects)
            .with_field("physical_objects", physical_objects);
        // Pages are unique per id; equal titles in different books stay apart.
        dedup.offer_keyed((id.to_string(), None), record, entry);
    }
    dedup
}
