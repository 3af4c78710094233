//! Record source trait
//!
//! The snapshot builder never talks to a database directly. A
//! `RecordSource` hands it one consistent [`RawDataset`] per rebuild.
//!
//! # Contract
//!
//! - Every entity collection plus `types`, `relations`, `relationtypes` and
//!   `users` is returned in full. Filtering on `active` happens in the
//!   [`Catalog`](crate::catalog::Catalog), so a source may return inactive
//!   documents.
//! - A collection that does not exist is empty, not an error.
//! - An unreadable or malformed collection is a [`SourceError`] and aborts the
//!   rebuild; the previously published snapshot stays in place.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::SourceError;
use crate::model::{EntityKind, RawDocument, RawRelation, RawRelationType, RawUser};

/// Everything one rebuild reads.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub collections: HashMap<EntityKind, Vec<RawDocument>>,
    pub relations: Vec<RawRelation>,
    pub relation_types: Vec<RawRelationType>,
    pub users: Vec<RawUser>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self, kind: EntityKind) -> &[RawDocument] {
        self.collections
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn push_document(&mut self, kind: EntityKind, doc: RawDocument) {
        self.collections.entry(kind).or_default().push(doc);
    }

    /// Total number of documents across entity and vocabulary collections.
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Supplier of raw documents for a rebuild.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Read the complete dataset.
    async fn load(&self) -> Result<RawDataset, SourceError>;
}

/// A source backed by an in-memory dataset. Used by tests and by callers
/// that assemble data themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dataset: RawDataset,
}

impl StaticSource {
    pub fn new(dataset: RawDataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<RawDataset, SourceError> {
        Ok(self.dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_hands_out_its_dataset() {
        let mut dataset = RawDataset::new();
        dataset.push_document(EntityKind::Work, RawDocument::new("w1"));
        dataset.push_document(EntityKind::Work, RawDocument::new("w2"));
        let source = StaticSource::new(dataset);

        let loaded = tokio_test::block_on(source.load()).expect("static load");
        assert_eq!(source.name(), "static");
        assert_eq!(loaded.document_count(), 2);
        assert!(loaded.documents(EntityKind::Person).is_empty());
    }
}
