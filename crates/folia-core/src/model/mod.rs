//! Data model shared by the pipeline and the query engine.

pub mod detail;
pub mod facet;
pub mod kind;
pub mod position;
pub mod raw;
pub mod record;
pub mod transcription;

pub use detail::{DetailCache, DetailEntry, Direction, MinimalEntity, RelationGroup, Relationship};
pub use facet::Facet;
pub use kind::EntityKind;
pub use position::{PagePosition, PhysicalObjectPosition, StructuralPosition, VisualObjectPosition};
pub use raw::{RawDocument, RawRelation, RawRelationType, RawUser};
pub use record::{EntityRecord, NONE_PLACEHOLDER};
pub use transcription::{normalize_query, TextVariant, Transcription};
