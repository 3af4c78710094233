//! Snapshot Pipeline
//!
//! Orchestrates rebuilds of the in-memory snapshot.
//!
//! ## Architecture
//!
//! - [`JsonDirSource`]: reads an exported collection dump from disk
//! - [`build_snapshot`]: runs the core passes over a loaded dataset
//! - [`SnapshotPipeline`]: load, build, publish; failures leave the store alone
//! - [`spawn_rebuild_loop`]: first rebuild plus optional periodic rebuilds
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folia_pipeline::{spawn_rebuild_loop, JsonDirSource, SnapshotPipeline};
//!
//! let store = Arc::new(SnapshotStore::new());
//! let source = Arc::new(JsonDirSource::new("./data"));
//! let pipeline = Arc::new(SnapshotPipeline::new(source, Arc::clone(&store)));
//! spawn_rebuild_loop(pipeline, None);
//! ```

#![warn(clippy::all)]

pub mod rebuild;
pub mod schedule;
pub mod source;

pub use rebuild::{build_snapshot, RebuildReport, SnapshotPipeline};
pub use schedule::spawn_rebuild_loop;
pub use source::JsonDirSource;
