//! HTTP interface over the published snapshot.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/health` | liveness and readiness |
//! | GET | `/health/ready` | 503 until the first rebuild lands |
//! | GET | `/filters/options?project=` | search-form vocabularies |
//! | GET | `/details/{entity}/{id}` | detail cache entry |
//! | POST | `/entities/search` | rule search |
//! | POST | `/graphs/search` | graph search |
//! | GET | `/images/{project}/{image}` | project image by stem |

#![warn(clippy::all)]

pub mod routes;
pub mod server;

mod error;
mod state;

pub use error::{ErrorBody, Result, WebError};
pub use server::{build_router, start_server};
pub use state::AppState;
