//! Run statistics for a harvest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one harvest run, written next to the downloaded images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Categories walked, including discovered ones
    pub category_count: usize,

    /// Category pages that failed to fetch or parse
    pub category_failures: usize,

    /// Unique items after deduplication
    pub item_count: usize,

    /// Cross-category duplicates dropped by the merge
    pub duplicates_removed: usize,

    /// Item pages that yielded at least one image candidate
    pub items_with_images: usize,

    /// Image candidates collected across all items
    pub image_count: usize,

    /// Downloads that succeeded (including already-present files)
    pub downloads_succeeded: usize,

    /// Downloads that failed
    pub download_failures: usize,
}

impl HarvestStats {
    /// Fraction of download attempts that succeeded, in `[0, 1]`.
    pub fn download_success_rate(&self) -> f64 {
        let attempted = self.downloads_succeeded + self.download_failures;
        if attempted == 0 {
            return 1.0;
        }
        self.downloads_succeeded as f64 / attempted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HarvestStats {
        HarvestStats {
            start_time: Utc::now(),
            end_time: Utc::now(),
            category_count: 0,
            category_failures: 0,
            item_count: 0,
            duplicates_removed: 0,
            items_with_images: 0,
            image_count: 0,
            downloads_succeeded: 0,
            download_failures: 0,
        }
    }

    #[test]
    fn success_rate_with_no_attempts_is_one() {
        assert_eq!(sample().download_success_rate(), 1.0);
    }

    #[test]
    fn success_rate_counts_failures() {
        let stats = HarvestStats {
            downloads_succeeded: 3,
            download_failures: 1,
            ..sample()
        };
        assert_eq!(stats.download_success_rate(), 0.75);
    }
}
