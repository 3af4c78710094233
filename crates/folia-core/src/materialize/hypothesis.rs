use super::{Deduplicator, Lookups};
use crate::model::{DetailEntry, EntityKind};

/// Hypotheses only feed the detail cache.
pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let mut dedup = Deduplicator::new(EntityKind::Hypothesis);
    for doc in lookups.catalog.documents(EntityKind::Hypothesis) {
        let entry = DetailEntry::new(EntityKind::Hypothesis, lookups.projects(&doc.id))
            .with_field("hypothesis_title", lookups.label_or(&doc.id, "Unknown Hypothesis"));
        dedup.detail_only(&doc.id, entry);
    }
    dedup
}
