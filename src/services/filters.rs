// src/services/filters.rs

//! Link filter rules for category listing pages.
//!
//! Each rule owns a named data table and exposes one predicate, so the link
//! extractor's pipeline stays a plain conjunction and every table is
//! testable on its own.

/// Prefix every internal article link starts with.
pub const ARTICLE_PREFIX: &str = "/wiki/";

/// Reserved namespaces, meta actions, and content-lifecycle markers.
/// Matched as substrings of the lowercased href.
pub const RESERVED_PATH_MARKERS: &[&str] = &[
    "category:",
    "file:",
    "image:",
    "template:",
    "help:",
    "user:",
    "talk:",
    "special:",
    "media:",
    "#",
    "edit",
    "history",
    "action=",
    "list_of",
    "changelog",
    "unused",
    "legacy",
    "cut_content",
    "removed",
    "obsolete",
    "deprecated",
    "beta",
    "alpha",
];

/// Non-item pages identified by their final path segment.
pub const META_PAGE_NAMES: &[&str] = &[
    "main_page",
    "community",
    "admin",
    "policy",
    "rules",
    "guidelines",
    "portal",
    "project",
    "server",
    "update",
    "patch",
    "version",
    "changelog",
    "news",
    "disambiguation",
];

/// Phrases that mark link text as a non-item page.
pub const TEXT_DENYLIST: &[&str] = &[
    "list of",
    "category",
    "template",
    "unused",
    "legacy",
    "removed",
    "cut",
    "beta",
    "alpha",
    "dev",
    "developer",
    "disambiguation",
    "redirect",
];

/// Navigation and meta phrases in link text.
pub const NAV_TEXT_DENYLIST: &[&str] = &[
    "main page",
    "home",
    "index",
    "portal",
    "edit",
    "talk",
    "discussion",
    "history",
    "list of",
    "category of",
    "overview of",
    "development",
    "roadmap",
    "changelog",
];

/// Acceptable visible link text length, inclusive.
pub const TEXT_LEN_MIN: usize = 1;
pub const TEXT_LEN_MAX: usize = 60;

/// Filter 1: the target must be an internal wiki article link.
pub fn is_article_href(href: &str) -> bool {
    href.starts_with(ARTICLE_PREFIX)
}

/// Filter 2: the path must not hit a reserved namespace or meta action.
pub fn has_reserved_marker(href: &str) -> bool {
    let href = href.to_lowercase();
    RESERVED_PATH_MARKERS
        .iter()
        .any(|marker| href.contains(marker))
}

/// Filter 3: the final path segment must not name a known meta page.
pub fn is_meta_page(href: &str) -> bool {
    let page_name = href.rsplit('/').next().unwrap_or(href).to_lowercase();
    META_PAGE_NAMES.iter().any(|meta| page_name.contains(meta))
}

/// Filter 4: visible text length within bounds.
pub fn has_reasonable_length(text: &str) -> bool {
    (TEXT_LEN_MIN..=TEXT_LEN_MAX).contains(&text.chars().count())
}

/// Filter 5: visible text free of non-item phrases.
pub fn text_is_denylisted(text: &str) -> bool {
    let text = text.to_lowercase();
    TEXT_DENYLIST.iter().any(|phrase| text.contains(phrase))
}

/// Filter 6: visible text free of navigation/meta phrases.
pub fn text_is_navigation(text: &str) -> bool {
    let text = text.to_lowercase();
    NAV_TEXT_DENYLIST.iter().any(|phrase| text.contains(phrase))
}

/// The full pipeline: all six rules must pass.
pub fn accepts_link(href: &str, text: &str) -> bool {
    is_article_href(href)
        && !has_reserved_marker(href)
        && !is_meta_page(href)
        && has_reasonable_length(text)
        && !text_is_denylisted(text)
        && !text_is_navigation(text)
}
