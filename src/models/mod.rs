// src/models/mod.rs

//! Domain models for the harvester application.

mod config;
mod folder;
mod item;
mod stats;

// Re-export all public types
pub use config::{Config, CrawlerConfig, SiteConfig};
pub use folder::FolderPath;
pub use item::{DiscoveryRank, DownloadOutcome, ImageCandidate, ItemLink};
pub use stats::HarvestStats;
