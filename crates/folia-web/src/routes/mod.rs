mod details;
mod filters;
mod health;
mod images;
mod search;

pub use details::detail_routes;
pub use filters::filter_routes;
pub use health::health_routes;
pub use images::image_routes;
pub use search::search_routes;
