//! # Gijie Common Library
//!
//! Shared code for the character showcase site:
//! - Data model for characters, series, arcs, links and synopsis entries
//! - Data loader (directory or HTTP source, required/optional resources)
//! - Color classifier (hex → coarse hue bucket)
//! - Filter/sort engine for listing views
//! - Carousel state machine for the pickup section
//! - Configuration loading

pub mod carousel;
pub mod collate;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod video;

pub use color::ColorGroup;
pub use error::{Error, Result};
pub use models::{Character, SiteData};
