// src/pipeline/harvest.rs

//! Harvest pipeline.
//!
//! Three sequential phases: link collection across category pages, image
//! extraction across the deduplicated item set, and download of every
//! collected candidate. Unit failures are logged and tallied, never
//! propagated; only setup errors abort the run.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, FolderPath, HarvestStats, ImageCandidate, ItemLink};
use crate::services::{
    CategoryDiscovery, Downloader, ImageExtractor, LinkExtractor, MergeOutcome, category_token,
    map_category, merge_links,
};
use crate::utils::http;
use crate::utils::rate::RateGate;

/// One queued download: candidate plus the owning item's identity.
struct DownloadJob {
    candidate: ImageCandidate,
    item_url: String,
    item_name: String,
    category: FolderPath,
}

/// Drives the three harvest phases over a shared client and config.
pub struct Harvester {
    config: Arc<Config>,
    client: Client,
    links: LinkExtractor,
    images: ImageExtractor,
    discovery: CategoryDiscovery,
    category_gate: RateGate,
    page_gate: RateGate,
    download_gate: RateGate,
}

impl Harvester {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_client(&config.crawler)?;
        Ok(Self {
            links: LinkExtractor::new(&config.site.base_url)?,
            images: ImageExtractor::new(&config.site)?,
            discovery: CategoryDiscovery::new(&config.site.base_url)?,
            category_gate: RateGate::from_millis(config.crawler.category_delay_ms),
            page_gate: RateGate::from_millis(config.crawler.page_delay_ms),
            download_gate: RateGate::from_millis(config.crawler.download_delay_ms),
            client,
            config,
        })
    }

    /// Seed categories extended with ones discovered on the items index.
    ///
    /// A failed index fetch only costs the discovered extras.
    pub async fn discover_categories(&self) -> Vec<String> {
        let mut categories = self.config.categories.clone();

        match http::fetch_page(&self.client, &self.config.site.items_index_url).await {
            Ok(document) => {
                let extra = self.discovery.discover(&document, &self.config.categories);
                log::info!("Discovered {} additional categories", extra.len());
                categories.extend(extra);
            }
            Err(e) => {
                log::warn!("Category discovery failed: {}", e);
            }
        }

        categories
    }

    /// Phase 1: collect item links from every category page.
    ///
    /// The stream is `buffered`, not unordered, so results come back in
    /// seed order and the dedup's first-seen policy stays deterministic.
    pub async fn collect_links(&self, categories: &[String]) -> (Vec<ItemLink>, usize) {
        let concurrency = self.config.crawler.max_concurrent.max(1);

        let results: Vec<_> = stream::iter(categories)
            .map(|url| async move {
                self.category_gate.wait().await;
                let folder = map_category(category_token(url));
                log::info!("Analyzing category: {}", url);
                let links = match http::fetch_page(&self.client, url).await {
                    Ok(document) => self.links.extract(&document, &folder),
                    Err(e) => {
                        log::warn!("Failed to load category {}: {}", url, e);
                        return Err(());
                    }
                };
                log::info!("Found {} items in {}", links.len(), folder);
                Ok(links)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut all_links = Vec::new();
        let mut failures = 0;
        for result in results {
            match result {
                Ok(links) => all_links.extend(links),
                Err(()) => failures += 1,
            }
        }
        (all_links, failures)
    }

    /// Phase 2: extract image candidates from every unique item page.
    async fn collect_images(&self, items: &[ItemLink]) -> Vec<DownloadJob> {
        let concurrency = self.config.crawler.max_concurrent.max(1);
        let total = items.len();

        stream::iter(items.iter().enumerate())
            .map(|(index, item)| async move {
                self.page_gate.wait().await;
                let candidates = match http::fetch_page(&self.client, &item.url).await {
                    Ok(document) => self.images.extract(&document, &item.name),
                    Err(e) => {
                        log::warn!("Failed to load item page {}: {}", item.url, e);
                        Vec::new()
                    }
                };

                if (index + 1) % 50 == 0 {
                    log::info!("Progress: {}/{} items processed", index + 1, total);
                }

                candidates
                    .into_iter()
                    .map(|candidate| DownloadJob {
                        candidate,
                        item_url: item.url.clone(),
                        item_name: item.name.clone(),
                        category: item.category.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Phase 3: download every collected candidate.
    async fn download_all(&self, jobs: Vec<DownloadJob>) -> (usize, usize) {
        let concurrency = self.config.crawler.max_concurrent.max(1);
        let downloader = Downloader::new(self.client.clone(), &self.config.site.output_dir);
        let downloader = &downloader;

        let outcomes: Vec<_> = stream::iter(jobs)
            .map(|job| async move {
                self.download_gate.wait().await;
                downloader
                    .download(
                        &job.candidate.source_url,
                        &job.item_name,
                        &job.candidate.variant,
                        &job.category,
                    )
                    .await
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
        (succeeded, outcomes.len() - succeeded)
    }
}

/// Run the full harvest and write a run report to the output directory.
pub async fn run_harvest(config: &Config) -> Result<HarvestStats> {
    let start_time = Utc::now();
    let harvester = Harvester::new(Arc::new(config.clone()))?;

    let categories = harvester.discover_categories().await;
    log::info!("Searching {} categories for items...", categories.len());

    // Phase 1: link collection
    let (all_links, category_failures) = harvester.collect_links(&categories).await;
    let MergeOutcome {
        items,
        duplicates_removed,
    } = merge_links(all_links);
    log::info!(
        "Found {} unique items ({} duplicates removed)",
        items.len(),
        duplicates_removed
    );

    // Phase 2: image extraction
    let jobs = harvester.collect_images(&items).await;
    let items_with_images = count_items_with_images(&jobs);
    log::info!(
        "Collected {} images from {}/{} items",
        jobs.len(),
        items_with_images,
        items.len()
    );

    // Phase 3: download
    let image_count = jobs.len();
    let (downloads_succeeded, download_failures) = harvester.download_all(jobs).await;

    let stats = HarvestStats {
        start_time,
        end_time: Utc::now(),
        category_count: categories.len(),
        category_failures,
        item_count: items.len(),
        duplicates_removed,
        items_with_images,
        image_count,
        downloads_succeeded,
        download_failures,
    };

    write_report(&config.site.output_dir, &stats).await?;

    log::info!(
        "Harvest complete: {}/{} images downloaded ({:.1}% success)",
        stats.downloads_succeeded,
        stats.image_count,
        stats.download_success_rate() * 100.0
    );

    Ok(stats)
}

/// Collect and deduplicate item links without touching item pages.
pub async fn run_links(config: &Config) -> Result<Vec<ItemLink>> {
    let harvester = Harvester::new(Arc::new(config.clone()))?;
    let categories = harvester.discover_categories().await;
    let (all_links, _) = harvester.collect_links(&categories).await;
    Ok(merge_links(all_links).items)
}

/// How many distinct items contributed at least one candidate.
///
/// Items are told apart by their `(url, name)` identity, the same key the
/// dedup phase uses; display names alone can collide across items.
fn count_items_with_images(jobs: &[DownloadJob]) -> usize {
    let owners: HashSet<(&str, &str)> = jobs
        .iter()
        .map(|job| (job.item_url.as_str(), job.item_name.as_str()))
        .collect();
    owners.len()
}

async fn write_report(output_dir: &str, stats: &HarvestStats) -> Result<()> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = std::path::Path::new(output_dir).join("harvest_report.json");
    let bytes = serde_json::to_vec_pretty(stats)?;
    tokio::fs::write(&path, bytes).await?;
    log::info!("Run report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiscoveryRank;

    fn job(item_url: &str, item_name: &str, source_url: &str) -> DownloadJob {
        DownloadJob {
            candidate: ImageCandidate {
                source_url: source_url.into(),
                variant: String::new(),
                rank: DiscoveryRank::Primary,
            },
            item_url: item_url.into(),
            item_name: item_name.into(),
            category: map_category("tools"),
        }
    }

    #[test]
    fn items_sharing_a_display_name_are_counted_apart() {
        let jobs = vec![
            job("https://dayz.fandom.com/wiki/Battery", "Battery", "a.png"),
            job("https://dayz.fandom.com/wiki/Car_Battery", "Battery", "b.png"),
        ];
        assert_eq!(count_items_with_images(&jobs), 2);
    }

    #[test]
    fn several_candidates_from_one_item_count_once() {
        let jobs = vec![
            job("https://dayz.fandom.com/wiki/Canteen", "Canteen", "a.png"),
            job("https://dayz.fandom.com/wiki/Canteen", "Canteen", "b.png"),
            job("https://dayz.fandom.com/wiki/Canteen", "Canteen", "c.png"),
        ];
        assert_eq!(count_items_with_images(&jobs), 1);
    }

    #[test]
    fn no_jobs_means_no_items() {
        assert_eq!(count_items_with_images(&[]), 0);
    }
}
