// src/services/mod.rs

//! Harvesting services: classification, extraction, deduplication, and
//! download.

pub mod categories;
pub mod dedup;
pub mod discovery;
pub mod download;
pub mod filters;
pub mod images;
pub mod links;

pub use categories::{category_token, map_category};
pub use dedup::{MergeOutcome, merge_links};
pub use discovery::CategoryDiscovery;
pub use download::Downloader;
pub use images::{CandidateSource, ImageExtractor};
pub use links::LinkExtractor;
