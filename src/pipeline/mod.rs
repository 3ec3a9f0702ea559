//! Pipeline entry points for harvester operations.
//!
//! - `run_harvest`: full three-phase run (links, images, downloads)
//! - `run_links`: link collection and dedup only

pub mod harvest;

pub use harvest::{Harvester, run_harvest, run_links};
