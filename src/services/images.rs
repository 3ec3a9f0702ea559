// src/services/images.rs

//! Image candidate extraction from item detail pages.
//!
//! Item pages are structurally inconsistent, so three strategies run in
//! fixed priority order: the first image in the main article content, the
//! gallery section, and a filename match against the item's name. The
//! filename fallback only runs when the primary strategy found nothing.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DiscoveryRank, ImageCandidate, SiteConfig};

/// Maximum candidates kept per item.
const MAX_CANDIDATES: usize = 3;

/// How many images the filename fallback inspects, page-wide.
const FALLBACK_SCAN_LIMIT: usize = 10;

/// Image file extensions accepted from the asset domain.
const ALLOWED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Brand/UI tokens that disqualify a source URL.
const UI_DENYLIST: &[&str] = &["logo", "banner", "nav", "header"];

/// Gallery sections additionally reject the wiki brand's own assets.
const GALLERY_DENYLIST: &[&str] = &["logo", "banner", "nav", "header", "fandom"];

/// Interaction/brand tokens rejected by the filename fallback.
const FALLBACK_DENYLIST: &[&str] = &[
    "logo", "banner", "nav", "header", "footer", "fandom", "discord", "reddit", "steam", "cursor",
    "edit", "view",
];

/// Thumbnail-size path markers for small UI images.
const UI_SIZE_MARKERS: &[&str] = &["/16px-", "/20px-", "/24px-", "/32px-", "/40px-"];

/// Name tokens shorter than this are too generic to match on.
const MIN_TOKEN_LEN: usize = 2;

/// A single discovery strategy. Strategies are pure over the parsed page
/// and never deduplicate; the owning extractor merges their output.
pub trait CandidateSource {
    fn attempt(&self, document: &Html, item_name: &str) -> Vec<ImageCandidate>;
}

/// Shared URL qualification and normalization rules.
#[derive(Clone)]
struct ImageRules {
    asset_domain: String,
    base_url: Url,
}

impl ImageRules {
    fn new(site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            asset_domain: site.asset_domain.to_lowercase(),
            base_url: Url::parse(&site.base_url)?,
        })
    }

    /// Asset-domain host, allowed extension, and none of the deny tokens.
    fn qualifies(&self, src: &str, denylist: &[&str]) -> bool {
        let lower = src.to_lowercase();
        lower.contains(&self.asset_domain)
            && ALLOWED_EXTENSIONS.iter().any(|ext| lower.contains(ext))
            && !denylist.iter().any(|token| lower.contains(token))
    }

    /// Absolutize and force the latest-revision path segment.
    fn normalize(&self, src: &str) -> String {
        let mut url = if src.starts_with("http") {
            src.to_string()
        } else if src.starts_with("//") {
            format!("https:{src}")
        } else {
            format!("{}{}", self.base_url.as_str().trim_end_matches('/'), src)
        };
        if !url.contains("/revision/") {
            url.push_str("/revision/latest");
        }
        url
    }

    /// Build a candidate from a qualifying raw source URL.
    fn candidate(&self, src: &str, rank: DiscoveryRank) -> ImageCandidate {
        let source_url = self.normalize(src);
        ImageCandidate {
            variant: variant_label(&source_url),
            source_url,
            rank,
        }
    }
}

/// The filename portion of an image URL, extension and query stripped.
///
/// Asset URLs carry trailing revision segments, so the filename is the last
/// path segment that actually contains a dot.
fn filename_stem(src: &str) -> &str {
    let without_query = src.split('?').next().unwrap_or(src);
    let segment = without_query
        .split('/')
        .rev()
        .find(|seg| seg.contains('.'))
        .or_else(|| without_query.rsplit('/').next())
        .unwrap_or(without_query);
    segment.split('.').next().unwrap_or(segment)
}

/// Human-readable variant label derived from the filename.
fn variant_label(src: &str) -> String {
    filename_stem(src).replace("%20", " ").replace('_', " ")
}

/// Strategy A: first image inside the main article content.
struct PrimaryIcon {
    rules: ImageRules,
    content_selector: Selector,
    img_selector: Selector,
}

impl CandidateSource for PrimaryIcon {
    fn attempt(&self, document: &Html, _item_name: &str) -> Vec<ImageCandidate> {
        let Some(content) = document.select(&self.content_selector).next() else {
            return Vec::new();
        };
        let Some(img) = content.select(&self.img_selector).next() else {
            return Vec::new();
        };
        let Some(src) = img.value().attr("src") else {
            return Vec::new();
        };
        if !self.rules.qualifies(src, UI_DENYLIST) {
            return Vec::new();
        }
        vec![self.rules.candidate(src, DiscoveryRank::Primary)]
    }
}

/// Strategy B: images between the gallery heading and the next section.
struct GallerySection {
    rules: ImageRules,
    gallery_selector: Selector,
    img_selector: Selector,
}

impl CandidateSource for GallerySection {
    fn attempt(&self, document: &Html, _item_name: &str) -> Vec<ImageCandidate> {
        let Some(marker) = document.select(&self.gallery_selector).next() else {
            return Vec::new();
        };
        let Some(heading) = marker.parent().and_then(ElementRef::wrap) else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for sibling in heading.next_siblings() {
            let Some(element) = ElementRef::wrap(sibling) else {
                continue;
            };
            // Stop at the next top-level section boundary.
            if matches!(element.value().name(), "h2" | "h3") {
                break;
            }
            let sources = if element.value().name() == "img" {
                element.value().attr("src").into_iter().collect::<Vec<_>>()
            } else {
                element
                    .select(&self.img_selector)
                    .filter_map(|img| img.value().attr("src"))
                    .collect()
            };
            for src in sources {
                if self.rules.qualifies(src, GALLERY_DENYLIST) {
                    candidates.push(self.rules.candidate(src, DiscoveryRank::Gallery));
                }
            }
        }
        candidates
    }
}

/// Strategy C: page-wide scan for filenames containing the item's name.
struct NameMatch {
    rules: ImageRules,
    img_selector: Selector,
}

impl NameMatch {
    fn name_tokens(item_name: &str) -> Vec<String> {
        item_name
            .to_lowercase()
            .replace('-', " ")
            .split_whitespace()
            .filter(|word| word.chars().count() > MIN_TOKEN_LEN)
            .map(str::to_string)
            .collect()
    }
}

impl CandidateSource for NameMatch {
    fn attempt(&self, document: &Html, item_name: &str) -> Vec<ImageCandidate> {
        let tokens = Self::name_tokens(item_name);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        for img in document.select(&self.img_selector).take(FALLBACK_SCAN_LIMIT) {
            let Some(src) = img.value().attr("src") else {
                continue;
            };
            if !self.rules.qualifies(src, FALLBACK_DENYLIST) {
                continue;
            }
            if UI_SIZE_MARKERS.iter().any(|marker| src.contains(marker)) {
                continue;
            }
            let stem = filename_stem(src).to_lowercase();
            if tokens.iter().any(|token| stem.contains(token)) {
                candidates.push(self.rules.candidate(src, DiscoveryRank::NameMatch));
            }
        }
        candidates
    }
}

/// Extracts an ordered, capped candidate list from an item page.
pub struct ImageExtractor {
    primary: PrimaryIcon,
    gallery: GallerySection,
    name_match: NameMatch,
}

impl ImageExtractor {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let rules = ImageRules::new(site)?;
        let img_selector = parse_selector("img")?;
        Ok(Self {
            primary: PrimaryIcon {
                rules: rules.clone(),
                content_selector: parse_selector("div.mw-parser-output, div.WikiaArticle")?,
                img_selector: img_selector.clone(),
            },
            gallery: GallerySection {
                rules: rules.clone(),
                gallery_selector: parse_selector("span#Gallery")?,
                img_selector: img_selector.clone(),
            },
            name_match: NameMatch {
                rules,
                img_selector,
            },
        })
    }

    /// Run the strategy cascade and return at most three candidates in
    /// discovery order.
    ///
    /// The gallery always runs; the filename fallback only when the primary
    /// strategy produced nothing.
    pub fn extract(&self, document: &Html, item_name: &str) -> Vec<ImageCandidate> {
        let mut candidates: Vec<ImageCandidate> = Vec::new();

        append_unique(&mut candidates, self.primary.attempt(document, item_name));
        let primary_found = !candidates.is_empty();

        append_unique(&mut candidates, self.gallery.attempt(document, item_name));

        if !primary_found {
            append_unique(&mut candidates, self.name_match.attempt(document, item_name));
        }

        candidates.truncate(MAX_CANDIDATES);
        candidates
    }
}

/// Append candidates whose resolved source URL is not already collected.
fn append_unique(collected: &mut Vec<ImageCandidate>, fresh: Vec<ImageCandidate>) {
    for candidate in fresh {
        if !collected.iter().any(|c| c.source_url == candidate.source_url) {
            collected.push(candidate);
        }
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
