//! HTTP handlers for gijie-site

pub mod buildinfo;
pub mod characters;
pub mod health;
pub mod pages;
pub mod pickup;
pub mod reload;

pub use buildinfo::get_build_info;
pub use characters::{classify_color, list_characters};
pub use health::health_routes;
pub use pages::{about_page, character_page, links_page, listing_page, pickup_fragment};
pub use pickup::pickup_routes;
pub use reload::reload_data;
