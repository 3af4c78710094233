//! # Folia Core
//!
//! Turns the raw documents and relation triples of a cultural-heritage
//! catalog into an in-memory snapshot: deduplicated entity records, per-entity
//! relationship caches, filter vocabularies and a graph projection.
//!
//! A rebuild runs these passes in order:
//!
//! 1. [`Catalog::build`] keeps active documents and resolves labels, kinds,
//!    projects and relation names.
//! 2. [`IndexContext::build`] projects triples into per-entity slots.
//! 3. [`materialize_all`] builds one record set per kind.
//! 4. [`populate_relationships`] then [`propagate_ancestors`] fill the detail
//!    cache.
//! 5. [`build_filter_options`] and [`GraphProjection::build`] derive the
//!    search-form vocabularies and the graph.
//!
//! The result is wrapped in a [`Snapshot`] and published through a
//! [`SnapshotStore`].

#![warn(clippy::all)]

pub mod ancestors;
pub mod catalog;
pub mod dates;
pub mod error;
pub mod filters;
pub mod graph;
pub mod index;
pub mod materialize;
pub mod minimal;
pub mod model;
pub mod populate;
pub mod snapshot;
pub mod source;
pub mod tables;
pub mod text;

pub use ancestors::propagate_ancestors;
pub use catalog::{Catalog, Triple};
pub use dates::{parse_date_to_range, Era, YearSpan};
pub use error::{CoreError, CoreResult, SourceError};
pub use filters::{build_filter_options, FilterBucket, FilterOptions};
pub use graph::{GraphEdge, GraphNode, GraphProjection};
pub use index::IndexContext;
pub use materialize::{materialize_all, Lookups, Materialized};
pub use model::{
    DetailEntry, EntityKind, EntityRecord, Facet, MinimalEntity, RawDocument, RawRelation,
    RawRelationType, RawUser, Relationship,
};
pub use populate::{populate_relationships, PopulateStats};
pub use snapshot::{Snapshot, SnapshotStats, SnapshotStore};
pub use source::{RawDataset, RecordSource, StaticSource};
pub use tables::vocabularies::ALL_PROJECTS;
