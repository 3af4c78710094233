use super::{Deduplicator, Lookups};
use crate::index::TextSlot;
use crate::model::{DetailEntry, EntityKind};

/// Places only feed the detail cache; they are never listed.
pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let mut dedup = Deduplicator::new(EntityKind::Place);
    for doc in lookups.catalog.documents(EntityKind::Place) {
        let Some(name) = lookups.index.text(TextSlot::PlaceName, &doc.id) else {
            continue;
        };
        let entry = DetailEntry::new(EntityKind::Place, lookups.projects(&doc.id))
            .with_field("place_name", name)
            .with_field("human_readable_id", lookups.code(doc, EntityKind::Place));
        dedup.detail_only(&doc.id, entry);
    }
    dedup
}
