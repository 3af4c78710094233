//! Static lookup tables
//!
//! Read-only data consumed by the indexer, the materializers and the
//! relationship populator. Nothing here depends on the dataset.

pub mod languages;
pub mod relations;
pub mod translations;
pub mod vocabularies;

pub use languages::normalize_language;
pub use translations::{master_translations, translate_date_notes};
