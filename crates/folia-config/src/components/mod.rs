//! Configuration sections, one per concern.

pub mod http;
pub mod logging;
pub mod rebuild;
pub mod source;

pub use http::*;
pub use logging::*;
pub use rebuild::*;
pub use source::*;
