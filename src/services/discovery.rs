// src/services/discovery.rs

//! Category discovery.
//!
//! Scans the items index page for category links missing from the seed
//! list, so new wiki categories are picked up without a config change.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::resolve_url;

/// Namespace marker identifying category links.
const CATEGORY_MARKER: &str = "/wiki/Category:";

/// Token a discovered category's href must contain.
const ITEM_KEYWORD: &str = "item";

/// Finds category listing pages beyond the configured seed list.
pub struct CategoryDiscovery {
    base_url: Url,
    anchor_selector: Selector,
}

impl CategoryDiscovery {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            anchor_selector: Selector::parse("a[href]")
                .map_err(|e| AppError::selector("a[href]", format!("{e:?}")))?,
        })
    }

    /// Extract additional category URLs from the items index page.
    ///
    /// Seed membership is checked verbatim; no case or trailing-slash
    /// normalization is applied, so near-duplicate URLs can pass through.
    pub fn discover(&self, document: &Html, seed: &[String]) -> Vec<String> {
        let mut additional = Vec::new();

        for anchor in document.select(&self.anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(CATEGORY_MARKER) || !href.to_lowercase().contains(ITEM_KEYWORD) {
                continue;
            }

            let full_url = if href.starts_with("http") {
                href.to_string()
            } else {
                resolve_url(&self.base_url, href)
            };

            if !seed.contains(&full_url) {
                log::debug!("Additional category found: {}", full_url);
                additional.push(full_url);
            }
        }

        additional
    }
}
