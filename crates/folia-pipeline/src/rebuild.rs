//! Snapshot rebuild orchestrator
//!
//! One rebuild reads the full dataset from a [`RecordSource`], runs every
//! core pass in order and publishes the result:
//!
//! ```text
//! RecordSource::load
//!   └─> Catalog::build            (active documents, labels, projects)
//!   └─> IndexContext::build       (relation triples into slots, then resolve)
//!   └─> volume reclassification   (manifestations that are volumes)
//!   └─> materialize_all           (one record set per kind)
//!   └─> populate_relationships    (detail cache)
//!   └─> propagate_ancestors       (FRBR ancestors on details)
//!   └─> filters + graph
//!   └─> SnapshotStore::publish
//! ```
//!
//! Nothing is published until every pass has finished. A failed rebuild
//! leaves the store exactly as it was.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use folia_core::{
    build_filter_options, materialize_all, populate_relationships, propagate_ancestors, Catalog,
    EntityKind, GraphProjection, IndexContext, Lookups, RawDataset, RecordSource, Snapshot,
    SnapshotStats, SnapshotStore,
};

/// Counters and timings of one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub documents: usize,
    pub relations: usize,
    pub volumes: usize,
    pub relationships_added: usize,
    pub ancestors_added: usize,
    pub stats: SnapshotStats,
    pub load_ms: u64,
    pub build_ms: u64,
}

/// Run every pass over a loaded dataset and return the finished snapshot.
///
/// Synchronous and CPU bound; callers on a runtime should move it off the
/// async workers.
pub fn build_snapshot(dataset: RawDataset) -> (Snapshot, RebuildReport) {
    let start = Instant::now();
    let mut report = RebuildReport {
        documents: dataset.document_count(),
        relations: dataset.relations.len(),
        ..Default::default()
    };

    let phase = Instant::now();
    let mut catalog = Catalog::build(dataset);
    debug!(elapsed_ms = phase.elapsed().as_millis() as u64, "Phase 1: catalog built");

    let phase = Instant::now();
    let index = IndexContext::build(&catalog);
    let volumes: Vec<String> = index.volume_ids().cloned().collect();
    for id in &volumes {
        catalog.set_kind(id, EntityKind::ManifestationVolume);
    }
    report.volumes = volumes.len();
    debug!(
        volumes = report.volumes,
        elapsed_ms = phase.elapsed().as_millis() as u64,
        "Phase 2: relations indexed"
    );

    let lookups = Lookups::new(&catalog, &index);

    let phase = Instant::now();
    let mut out = materialize_all(lookups);
    debug!(
        records = out.record_count(),
        elapsed_ms = phase.elapsed().as_millis() as u64,
        "Phase 3: entities materialized"
    );

    let phase = Instant::now();
    let populated = populate_relationships(lookups, &mut out);
    report.relationships_added = populated.added;
    report.ancestors_added = propagate_ancestors(lookups, &mut out);
    debug!(
        added = populated.added,
        duplicates = populated.duplicates,
        roles = populated.roles,
        ancestors = report.ancestors_added,
        elapsed_ms = phase.elapsed().as_millis() as u64,
        "Phase 4: relationships populated"
    );

    let phase = Instant::now();
    let filters = build_filter_options(&out, &catalog.all_projects());
    let graph = GraphProjection::build(&catalog, &out);
    debug!(
        projects = filters.len(),
        edges = graph.edges.len(),
        elapsed_ms = phase.elapsed().as_millis() as u64,
        "Phase 5: filters and graph derived"
    );

    let snapshot = Snapshot::new(out, filters, graph);
    report.stats = snapshot.stats();
    report.build_ms = start.elapsed().as_millis() as u64;
    (snapshot, report)
}

/// Loads from a source and publishes into a store.
pub struct SnapshotPipeline {
    source: Arc<dyn RecordSource>,
    store: Arc<SnapshotStore>,
}

impl SnapshotPipeline {
    pub fn new(source: Arc<dyn RecordSource>, store: Arc<SnapshotStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Load, build and publish one snapshot.
    pub async fn rebuild(&self) -> Result<RebuildReport> {
        let start = Instant::now();
        info!(source = self.source.name(), "Rebuilding snapshot");

        let dataset = self
            .source
            .load()
            .await
            .with_context(|| format!("Failed to load dataset from '{}'", self.source.name()))?;
        let load_ms = start.elapsed().as_millis() as u64;
        debug!(documents = dataset.document_count(), load_ms, "Dataset loaded");

        let (snapshot, mut report) = tokio::task::spawn_blocking(move || build_snapshot(dataset))
            .await
            .context("Snapshot build task failed")?;
        report.load_ms = load_ms;

        self.store.publish(snapshot);
        info!(
            documents = report.documents,
            relations = report.relations,
            records = report.stats.records,
            details = report.stats.details,
            edges = report.stats.edges,
            total_ms = start.elapsed().as_millis() as u64,
            "Completed rebuild in {}ms (load:{}, build:{})",
            start.elapsed().as_millis(),
            report.load_ms,
            report.build_ms
        );
        Ok(report)
    }

    /// Rebuild, logging instead of returning a failure.
    pub async fn rebuild_logged(&self) -> Option<RebuildReport> {
        match self.rebuild().await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(
                    ready = self.store.is_ready(),
                    "Rebuild failed, keeping previous snapshot: {:#}", e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folia_core::{RawDocument, SourceError, StaticSource};

    struct FailingSource;

    #[async_trait::async_trait]
    impl RecordSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn load(&self) -> Result<RawDataset, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }

    fn dataset() -> RawDataset {
        let mut dataset = RawDataset::new();
        let mut work = RawDocument::new("w1");
        work.description = Some("w_0001".into());
        dataset.push_document(EntityKind::Work, work);
        dataset
    }

    #[test]
    fn build_reports_counts() {
        let (_, report) = build_snapshot(dataset());
        assert_eq!(report.documents, 1);
        assert_eq!(report.relations, 0);
        assert_eq!(report.volumes, 0);
    }

    #[tokio::test]
    async fn rebuild_publishes_and_marks_ready() {
        let store = Arc::new(SnapshotStore::new());
        let pipeline = SnapshotPipeline::new(Arc::new(StaticSource::new(dataset())), Arc::clone(&store));
        assert!(!store.is_ready());

        pipeline.rebuild().await.expect("rebuild");
        assert!(store.is_ready());
        assert!(store.current().is_ok());
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_the_store_untouched() {
        let store = Arc::new(SnapshotStore::new());
        let pipeline = SnapshotPipeline::new(Arc::new(FailingSource), Arc::clone(&store));

        let err = pipeline.rebuild().await.unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
        assert!(pipeline.rebuild_logged().await.is_none());
        assert!(!store.is_ready());
    }
}
