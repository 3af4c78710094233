//! Phase 2: forward-reference resolution.

use std::collections::{BTreeSet, HashMap};

use super::{IndexContext, LinkSlot, ParentSlot, PlaceSlot, TextSlot};
use crate::catalog::Catalog;
use crate::model::EntityKind;

/// Manifestation-keyed scalars that belong on the volume when the subject
/// turns out to be a volume.
const VOLUME_TEXTS: [(TextSlot, TextSlot); 4] = [
    (TextSlot::ManifestationShortTitle, TextSlot::VolumeShortTitle),
    (TextSlot::ManifestationDate, TextSlot::VolumeDate),
    (TextSlot::ManifestationDateRange, TextSlot::VolumeDateRange),
    (TextSlot::ManifestationNumberOfVolumes, TextSlot::VolumeNumberOfVolumes),
];

pub(super) fn run(ctx: &mut IndexContext, catalog: &Catalog) {
    reroute_volumes(ctx);
    resolve_places(ctx);
    link_items_through_volumes(ctx);
    link_visual_objects_to_items(ctx);
    resolve_hypotheses(ctx, catalog);
}

fn reroute_volumes(ctx: &mut IndexContext) {
    let volumes: Vec<String> = ctx.volume_ids().cloned().collect();
    for volume in &volumes {
        for (from, to) in VOLUME_TEXTS {
            if ctx.has_text(to, volume) {
                continue;
            }
            if let Some(value) = ctx.take_text(from, volume) {
                ctx.set_text(to, volume, value);
            }
        }
        if ctx.place(PlaceSlot::Volume, volume).is_none() {
            if let Some(place) = ctx.take_place(PlaceSlot::Manifestation, volume) {
                ctx.set_place(PlaceSlot::Volume, volume, place);
            }
        }
        if !ctx.has_links(LinkSlot::VolumePublishers, volume) {
            for publisher in ctx.take_links(LinkSlot::ManifestationPublishers, volume) {
                ctx.push_link(LinkSlot::VolumePublishers, volume, &publisher);
            }
        }
    }
}

fn resolve_places(ctx: &mut IndexContext) {
    let names: HashMap<String, String> = ctx
        .texts
        .get(&TextSlot::PlaceName)
        .cloned()
        .unwrap_or_default();
    for slot in PlaceSlot::ALL {
        if let Some(places) = ctx.places_mut(slot) {
            for place in places.values_mut() {
                if let Some(name) = names.get(&place.place_id) {
                    place.place_name = name.clone();
                }
            }
        }
    }
}

/// Items linked only to a volume belong to the volume's manifestation.
fn link_items_through_volumes(ctx: &mut IndexContext) {
    for (item, volume) in ctx.parent_entries(ParentSlot::ItemVolume) {
        if ctx.parent(ParentSlot::ItemManifestation, &item).is_some() {
            continue;
        }
        if let Some(manifestation) = ctx
            .parent(ParentSlot::VolumeManifestation, &volume)
            .map(str::to_string)
        {
            ctx.set_parent(ParentSlot::ItemManifestation, &item, &manifestation);
        }
    }
}

fn link_visual_objects_to_items(ctx: &mut IndexContext) {
    for (visual_object, page) in ctx.parent_entries(ParentSlot::VisualObjectPage) {
        if let Some(item) = ctx.parent(ParentSlot::PageItem, &page).map(str::to_string) {
            ctx.set_parent(ParentSlot::VisualObjectItem, &visual_object, &item);
        }
    }
}

/// Display label of a hypothesis subject.
fn subject_label(ctx: &IndexContext, catalog: &Catalog, id: &str) -> String {
    let slot = match catalog.kind(id) {
        Some(EntityKind::Person) => Some(TextSlot::PersonName),
        Some(EntityKind::Work) => Some(TextSlot::WorkUniformTitle),
        Some(EntityKind::Item) => Some(TextSlot::ItemShelfMark),
        Some(EntityKind::Institution) => Some(TextSlot::InstitutionName),
        Some(EntityKind::Event) => Some(TextSlot::EventName),
        Some(EntityKind::AbstractCharacter) => Some(TextSlot::AbstractCharacterName),
        Some(EntityKind::VisualObject) => Some(TextSlot::VisualObjectName),
        Some(EntityKind::PhysicalObject) => Some(TextSlot::PhysicalObjectName),
        Some(EntityKind::Place) => Some(TextSlot::PlaceName),
        _ => None,
    };
    slot.and_then(|slot| ctx.text(slot, id))
        .map(str::to_string)
        .unwrap_or_else(|| catalog.label_or(id, "Unknown"))
}

fn resolve_hypotheses(ctx: &mut IndexContext, catalog: &Catalog) {
    let mut creators: HashMap<String, String> = HashMap::new();
    let mut subjects: HashMap<String, String> = HashMap::new();
    for (hypothesis, creator) in ctx.parent_entries(ParentSlot::HypothesisCreator) {
        let name = ctx
            .text(TextSlot::PersonName, &creator)
            .map(str::to_string)
            .unwrap_or_else(|| catalog.label_or(&creator, "Unknown Creator"));
        creators.insert(hypothesis, name);
    }
    if let Some(about) = ctx.links.get(&LinkSlot::HypothesisAbout) {
        for (hypothesis, ids) in about {
            let labels: BTreeSet<String> = ids
                .iter()
                .map(|id| subject_label(ctx, catalog, id))
                .collect();
            if !labels.is_empty() {
                let joined = labels.into_iter().collect::<Vec<_>>().join("; ");
                subjects.insert(hypothesis.clone(), joined);
            }
        }
    }
    for summary in ctx.hypotheses_mut() {
        if let Some(name) = creators.get(&summary.hypothesis_id) {
            summary.creator_name = name.clone();
        }
        if let Some(about) = subjects.get(&summary.hypothesis_id) {
            summary.hypothesis_about = Some(about.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::catalog;

    #[test]
    fn places_resolve_after_their_names() {
        let catalog = catalog(
            &[
                (EntityKind::Place, "l1", "loc_1"),
                (EntityKind::Type, "n1", "Venezia"),
            ],
            &[
                ("m1", "manifestation_published_in_place", "l1"),
                ("l1", "place_has_name", "n1"),
            ],
        );
        let ctx = IndexContext::build(&catalog);
        assert_eq!(
            ctx.place(PlaceSlot::Manifestation, "m1").map(|p| p.place_name.as_str()),
            Some("Venezia")
        );
    }

    #[test]
    fn volume_attributes_move_to_volume_slots() {
        let catalog = catalog(
            &[
                (EntityKind::Type, "st", "Opere"),
                (EntityKind::Type, "d", "1850"),
                (EntityKind::Person, "p1", "Tipografia"),
            ],
            &[
                ("v1", "manifestation_has_short_title", "st"),
                ("v1", "manifestation_has_publication_date", "d"),
                ("v1", "manifestation_published_by", "p1"),
                ("m1", "manifestation_has_volume", "v1"),
            ],
        );
        let ctx = IndexContext::build(&catalog);
        assert_eq!(ctx.text(TextSlot::VolumeShortTitle, "v1"), Some("Opere"));
        assert_eq!(ctx.text(TextSlot::ManifestationShortTitle, "v1"), None);
        assert_eq!(ctx.text(TextSlot::VolumeDate, "v1"), Some("1850"));
        assert_eq!(ctx.links(LinkSlot::VolumePublishers, "v1"), ["p1"]);
    }

    #[test]
    fn items_reach_manifestations_through_volumes() {
        let catalog = catalog(
            &[],
            &[
                ("i1", "item_has_manifestation_volume", "v1"),
                ("m1", "manifestation_has_volume", "v1"),
                ("i2", "item_has_manifestation_volume", "v1"),
                ("i2", "is_item_of_manifestation", "m2"),
            ],
        );
        let ctx = IndexContext::build(&catalog);
        assert_eq!(ctx.parent(ParentSlot::ItemManifestation, "i1"), Some("m1"));
        assert_eq!(ctx.parent(ParentSlot::ItemManifestation, "i2"), Some("m2"));
    }

    #[test]
    fn hypotheses_get_creators_and_subjects() {
        let catalog = catalog(
            &[
                (EntityKind::Hypothesis, "h1", "Attribution"),
                (EntityKind::Person, "p1", "p_1"),
                (EntityKind::Work, "w1", "w_1"),
                (EntityKind::Type, "n1", "Petrarca"),
                (EntityKind::Type, "t1", "Canzoniere"),
            ],
            &[
                ("w1", "work_has_hypothesis", "h1"),
                ("h1", "hypothesis_created_by_person", "p1"),
                ("h1", "is_hypothesis_about", "w1"),
                ("h1", "is_hypothesis_about", "p1"),
                ("h1", "is_hypothesis_about", "w1"),
                ("p1", "person_has_name", "n1"),
                ("w1", "work_has_uniform_title", "t1"),
            ],
        );
        let ctx = IndexContext::build(&catalog);
        let summary = &ctx.hypotheses("w1")[0];
        assert_eq!(summary.hypothesis_title, "Attribution");
        assert_eq!(summary.creator_name, "Petrarca");
        assert_eq!(summary.hypothesis_about.as_deref(), Some("Canzoniere; Petrarca"));
    }

    #[test]
    fn visual_objects_inherit_the_item_of_their_page() {
        let catalog = catalog(
            &[],
            &[
                ("g1", "page_contains_visual_object", "vo1"),
                ("i1", "item_has_page", "g1"),
            ],
        );
        let ctx = IndexContext::build(&catalog);
        assert_eq!(ctx.parent(ParentSlot::VisualObjectItem, "vo1"), Some("i1"));
    }
}
