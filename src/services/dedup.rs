// src/services/dedup.rs

//! Cross-category item deduplication.

use std::collections::HashSet;

use crate::models::ItemLink;

/// Result of merging per-category link sets.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Unique items in first-seen order
    pub items: Vec<ItemLink>,

    /// How many later occurrences were dropped
    pub duplicates_removed: usize,
}

/// Merge links from all categories, keeping the first occurrence of each
/// `(url, name)` pair.
///
/// Items listed under several categories keep the category they were first
/// seen with; later conflicting assignments are dropped silently. Processing
/// order therefore decides the pinned category.
pub fn merge_links(all_links: Vec<ItemLink>) -> MergeOutcome {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut outcome = MergeOutcome::default();

    for link in all_links {
        let (url, name) = link.identity();
        let key = (url.to_string(), name.to_string());
        if seen.insert(key) {
            outcome.items.push(link);
        } else {
            outcome.duplicates_removed += 1;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::categories::map_category;

    fn link(url: &str, name: &str, token: &str) -> ItemLink {
        ItemLink {
            url: url.into(),
            name: name.into(),
            category: map_category(token),
        }
    }

    #[test]
    fn first_seen_category_wins() {
        let merged = merge_links(vec![
            link("https://dayz.fandom.com/wiki/FX-45", "FX-45", "weapons"),
            link("https://dayz.fandom.com/wiki/FX-45", "FX-45", "pistols"),
        ]);
        assert_eq!(merged.items.len(), 1);
        assert_eq!(merged.items[0].category.as_str(), "Weapons");
        assert_eq!(merged.duplicates_removed, 1);
    }

    #[test]
    fn distinct_names_for_one_url_are_kept_apart() {
        let merged = merge_links(vec![
            link("https://dayz.fandom.com/wiki/MRE", "MRE", "food"),
            link("https://dayz.fandom.com/wiki/MRE", "Field Ration", "food"),
        ]);
        assert_eq!(merged.items.len(), 2);
        assert_eq!(merged.duplicates_removed, 0);
    }

    #[test]
    fn order_is_preserved() {
        let merged = merge_links(vec![
            link("https://dayz.fandom.com/wiki/A", "A", "tools"),
            link("https://dayz.fandom.com/wiki/B", "B", "tools"),
            link("https://dayz.fandom.com/wiki/A", "A", "electronics"),
            link("https://dayz.fandom.com/wiki/C", "C", "tools"),
        ]);
        let names: Vec<_> = merged.items.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
