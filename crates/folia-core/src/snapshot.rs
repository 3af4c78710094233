//! Snapshot Store
//!
//! A [`Snapshot`] bundles everything queries read: materialized records, the
//! detail cache, filter vocabularies and the graph projection. It is built off
//! to the side and published with one swap; readers clone the `Arc` and never
//! hold the lock while they work.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::filters::FilterOptions;
use crate::graph::GraphProjection;
use crate::materialize::Materialized;
use crate::model::{DetailEntry, EntityKind, EntityRecord};

/// Counters reported after a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub records: usize,
    pub details: usize,
    pub aliases: usize,
    pub edges: usize,
    pub graph_nodes: usize,
}

/// One immutable, fully built view of the catalog.
#[derive(Debug)]
pub struct Snapshot {
    out: Materialized,
    filters: FilterOptions,
    graph: GraphProjection,
    built_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(out: Materialized, filters: FilterOptions, graph: GraphProjection) -> Self {
        Self {
            out,
            filters,
            graph,
            built_at: Utc::now(),
        }
    }

    /// Snapshot with no records; every search comes back empty.
    pub fn empty() -> Self {
        Self::new(Materialized::new(), FilterOptions::default(), GraphProjection::default())
    }

    pub fn records(&self, kind: EntityKind) -> &[EntityRecord] {
        self.out.records(kind)
    }

    pub fn record(&self, kind: EntityKind, id: &str) -> Option<&EntityRecord> {
        self.out.get(kind, id)
    }

    /// Detail entry of a kind; merged duplicates resolve to their winner.
    pub fn detail(&self, kind: EntityKind, id: &str) -> CoreResult<&DetailEntry> {
        self.out.details.lookup(kind, id).ok_or_else(|| {
            CoreError::NotFound(format!("{} with ID '{}' not found", kind.display_name(), id))
        })
    }

    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    pub fn graph(&self) -> &GraphProjection {
        &self.graph
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            records: self.out.record_count(),
            details: self.out.details.len(),
            aliases: self.out.details.alias_count(),
            edges: self.graph.edges.len(),
            graph_nodes: self.graph.node_count(),
        }
    }
}

#[derive(Default)]
struct Published {
    snapshot: Option<Arc<Snapshot>>,
    ready: bool,
}

/// Holder of the currently published snapshot.
///
/// The snapshot reference and the readiness flag live under one lock, so a
/// reader sees either the old pair or the new pair.
#[derive(Default)]
pub struct SnapshotStore {
    published: RwLock<Published>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.published.read().ready
    }

    /// The published snapshot, or [`CoreError::NotReady`] before the first
    /// successful build.
    pub fn current(&self) -> CoreResult<Arc<Snapshot>> {
        let published = self.published.read();
        match (&published.snapshot, published.ready) {
            (Some(snapshot), true) => Ok(Arc::clone(snapshot)),
            _ => Err(CoreError::NotReady),
        }
    }

    /// Swap in a new snapshot and mark the store ready.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let stats = snapshot.stats();
        {
            let mut published = self.published.write();
            published.snapshot = Some(Arc::clone(&snapshot));
            published.ready = true;
        }
        info!(
            records = stats.records,
            details = stats.details,
            aliases = stats.aliases,
            edges = stats.edges,
            "Published snapshot"
        );
        snapshot
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.published.read().snapshot.as_ref().map(|s| s.built_at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn reads_fail_fast_until_first_publish() {
        let store = SnapshotStore::new();
        assert!(!store.is_ready());
        assert!(matches!(store.current(), Err(CoreError::NotReady)));
        assert!(store.built_at().is_none());

        store.publish(Snapshot::empty());
        assert!(store.is_ready());
        assert!(store.current().is_ok());
    }

    #[test]
    fn readers_keep_their_snapshot_across_a_swap() {
        let store = Arc::new(SnapshotStore::new());
        store.publish(Snapshot::empty());
        let held = store.current().unwrap();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.publish(Snapshot::empty());
            })
        };
        writer.join().unwrap();

        let fresh = store.current().unwrap();
        assert!(!Arc::ptr_eq(&held, &fresh));
        assert_eq!(held.stats(), SnapshotStats::default());
    }

    #[test]
    fn missing_detail_names_the_kind() {
        let snapshot = Snapshot::empty();
        let err = snapshot.detail(EntityKind::VisualObject, "x1").unwrap_err();
        assert_eq!(err.to_string(), "Visual Object with ID 'x1' not found");
    }
}
