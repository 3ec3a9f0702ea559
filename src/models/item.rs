//! Item and image candidate data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::FolderPath;

/// A link to an item detail page, discovered on a category listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemLink {
    /// Absolute URL of the item page
    pub url: String,

    /// Visible link text, used as the item's display name
    pub name: String,

    /// Classification assigned from the listing page's category
    pub category: FolderPath,
}

impl ItemLink {
    /// Identity key for deduplication across categories.
    ///
    /// The assigned category is deliberately excluded: the same item listed
    /// under several categories keeps its first-seen assignment.
    pub fn identity(&self) -> (&str, &str) {
        (&self.url, &self.name)
    }
}

/// Which discovery strategy produced an image candidate.
///
/// Ordering matters: candidates are kept in ascending rank order before the
/// per-item cap is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiscoveryRank {
    /// First image in the main article content
    Primary,
    /// Image found in the gallery section
    Gallery,
    /// Filename matched the item name (fallback)
    NameMatch,
}

/// An image URL extracted from an item page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Absolute image URL on the asset domain
    pub source_url: String,

    /// Variant label derived from the filename (e.g. "Green")
    pub variant: String,

    /// Strategy that discovered this candidate
    pub rank: DiscoveryRank,
}

/// Result of a single download attempt. Used only for run-level tallying.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub target: PathBuf,
    pub succeeded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_category() {
        let a = ItemLink {
            url: "https://dayz.fandom.com/wiki/FX-45".into(),
            name: "FX-45".into(),
            category: FolderPath::new("Weapons/Pistols"),
        };
        let b = ItemLink {
            category: FolderPath::new("Weapons"),
            ..a.clone()
        };
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn rank_orders_primary_first() {
        assert!(DiscoveryRank::Primary < DiscoveryRank::Gallery);
        assert!(DiscoveryRank::Gallery < DiscoveryRank::NameMatch);
    }
}
