//! # Folia Query
//!
//! Read-only operations over a published [`folia_core::Snapshot`]: rule-based
//! entity search, graph extraction and detail lookup. Request types live in
//! [`request`] and are validated before they run.

#![warn(clippy::all)]

pub mod dates;
pub mod detail;
pub mod engine;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod projection;
pub mod request;

pub use detail::lookup_detail;
pub use engine::{run_search, SearchResponse};
pub use error::{QueryError, QueryResult};
pub use graph::{run_graph_search, EdgeView, GraphResponse};
pub use request::{
    FilterField, FilterRule, GraphSearchQuery, GraphType, Logic, Operator, OrderBy,
    ProximityLogic, ProximityOperator, ProximityQuery, ProximityTerm, SearchQuery,
};
