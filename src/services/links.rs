// src/services/links.rs

//! Item link extraction from category listing pages.
//!
//! Listing pages vary structurally across the wiki, so discovery cascades:
//! a dedicated member-list container when present, generic containers whose
//! class carries a MediaWiki or category marker, and finally the whole
//! document when neither turned anything up.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FolderPath, ItemLink};
use crate::services::filters;
use crate::utils::resolve_url;

/// Member-list containers, most specific first.
const MEMBER_LIST_SELECTORS: &[&str] = &[
    "div#mw-pages",
    "div.mw-category",
    "div.category-page__members",
];

/// Class substrings that mark a generic container as category structure.
const CONTAINER_CLASS_MARKERS: &[&str] = &["mw-", "category"];

/// Extracts item links from category listing pages.
pub struct LinkExtractor {
    base_url: Url,
    anchor_selector: Selector,
    container_selector: Selector,
    member_list_selectors: Vec<Selector>,
}

impl LinkExtractor {
    /// Create an extractor that absolutizes links against the given base.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            anchor_selector: parse_selector("a[href]")?,
            container_selector: parse_selector("ul, ol, table, div")?,
            member_list_selectors: MEMBER_LIST_SELECTORS
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
        })
    }

    /// Extract all item links from one listing page.
    ///
    /// Every emitted link carries the page's category; within-page
    /// duplicates are collapsed by `(url, name)`.
    pub fn extract(&self, document: &Html, category: &FolderPath) -> Vec<ItemLink> {
        let containers = self.find_containers(document);

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut links = Vec::new();

        for container in containers {
            for anchor in container.select(&self.anchor_selector) {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                let text = anchor.text().collect::<String>().trim().to_string();

                if !filters::accepts_link(href, &text) {
                    continue;
                }

                let url = resolve_url(&self.base_url, href);
                if seen.insert((url.clone(), text.clone())) {
                    log::debug!("Found item: {} -> {}", text, category);
                    links.push(ItemLink {
                        url,
                        name: text,
                        category: category.clone(),
                    });
                }
            }
        }

        links
    }

    /// Container discovery cascade.
    ///
    /// The member list and marker-class containers are unioned when both
    /// exist; the whole document is a last resort, not a supplement.
    fn find_containers<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let mut containers = Vec::new();

        for selector in &self.member_list_selectors {
            if let Some(member_list) = document.select(selector).next() {
                containers.push(member_list);
                break;
            }
        }

        containers.extend(
            document
                .select(&self.container_selector)
                .filter(|el| has_marker_class(el)),
        );

        if containers.is_empty() {
            containers.push(document.root_element());
        }

        containers
    }
}

fn has_marker_class(element: &ElementRef) -> bool {
    let Some(class) = element.value().attr("class") else {
        return false;
    };
    let class_lower = class.to_lowercase();
    CONTAINER_CLASS_MARKERS
        .iter()
        .any(|marker| class_lower.contains(marker))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::categories::map_category;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new("https://dayz.fandom.com").unwrap()
    }

    fn extract(html: &str) -> Vec<ItemLink> {
        let document = Html::parse_document(html);
        extractor().extract(&document, &map_category("pistols"))
    }

    #[test]
    fn extracts_from_member_list_container() {
        let html = r#"
            <div id="mw-pages">
                <a href="/wiki/FX-45">FX-45</a>
                <a href="/wiki/Mlock-91">Mlock-91</a>
            </div>
            <div class="sidebar">
                <a href="/wiki/Derringer">Derringer</a>
            </div>
        "#;
        let links = extract(html);
        let names: Vec<_> = links.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"FX-45"));
        assert!(names.contains(&"Mlock-91"));
        // The sidebar has no marker class and the member list exists, so the
        // whole-document fallback never runs.
        assert!(!names.contains(&"Derringer"));
    }

    #[test]
    fn every_member_list_variant_is_recognized() {
        for container in [
            r#"<div id="mw-pages"><a href="/wiki/FX-45">FX-45</a></div>"#,
            r#"<div class="mw-category"><a href="/wiki/FX-45">FX-45</a></div>"#,
            r#"<div class="category-page__members"><a href="/wiki/FX-45">FX-45</a></div>"#,
        ] {
            let links = extract(container);
            assert_eq!(links.len(), 1, "no link from {container}");
            assert_eq!(links[0].name, "FX-45");
        }
    }

    #[test]
    fn marker_class_containers_are_unioned_with_member_list() {
        let html = r#"
            <div id="mw-pages"><a href="/wiki/FX-45">FX-45</a></div>
            <ul class="category-page__list"><li>
                <a href="/wiki/Derringer">Derringer</a>
            </li></ul>
        "#;
        let links = extract(html);
        let names: Vec<_> = links.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"FX-45"));
        assert!(names.contains(&"Derringer"));
    }

    #[test]
    fn falls_back_to_whole_document() {
        let html = r#"
            <body>
                <a href="/wiki/Canteen">Canteen</a>
                <a href="/wiki/Main_Page">Main Page</a>
                <a href="https://example.com/wiki/External">External</a>
            </body>
        "#;
        let links = extract(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Canteen");
        assert_eq!(links[0].url, "https://dayz.fandom.com/wiki/Canteen");
    }

    #[test]
    fn all_filters_apply_inside_containers() {
        let html = r#"
            <div class="mw-category">
                <a href="/wiki/FX-45">FX-45</a>
                <a href="/wiki/Category:Pistols">Pistols</a>
                <a href="/wiki/Weapon_Disambiguation">Weapon Disambiguation</a>
                <a href="/wiki/FX-45?action=edit">FX-45</a>
                <a href="/wiki/Empty"></a>
            </div>
        "#;
        let links = extract(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "FX-45");
    }

    #[test]
    fn within_page_duplicates_collapse() {
        let html = r#"
            <div id="mw-pages"><a href="/wiki/FX-45">FX-45</a></div>
            <div class="mw-category"><a href="/wiki/FX-45">FX-45</a></div>
        "#;
        let links = extract(html);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn category_is_fixed_to_the_listing_page() {
        let html = r#"<div id="mw-pages"><a href="/wiki/FX-45">FX-45</a></div>"#;
        let links = extract(html);
        assert_eq!(links[0].category.as_str(), "Weapons/Pistols");
    }
}
