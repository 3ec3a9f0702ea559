//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
///
/// Every field has a default that reproduces the harvester's built-in
/// constants, so the binary runs without any config file present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and pacing behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Wiki site endpoints and output location
    #[serde(default)]
    pub site: SiteConfig,

    /// Category listing pages to walk
    #[serde(default = "defaults::categories")]
    pub categories: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::validation(format!("site.base_url is invalid: {e}")))?;
        if self.site.asset_domain.trim().is_empty() {
            return Err(AppError::validation("site.asset_domain is empty"));
        }
        if self.categories.is_empty() {
            return Err(AppError::validation("No categories defined"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            site: SiteConfig::default(),
            categories: defaults::categories(),
        }
    }
}

/// HTTP client and request pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Minimum interval between category page requests in milliseconds
    #[serde(default = "defaults::category_delay")]
    pub category_delay_ms: u64,

    /// Minimum interval between item page requests in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Minimum interval between image downloads in milliseconds
    #[serde(default = "defaults::download_delay")]
    pub download_delay_ms: u64,

    /// Maximum concurrent requests per phase
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            category_delay_ms: defaults::category_delay(),
            page_delay_ms: defaults::page_delay(),
            download_delay_ms: defaults::download_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Wiki endpoints and output location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the wiki, used to absolutize relative links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Host expected to serve legitimate item images
    #[serde(default = "defaults::asset_domain")]
    pub asset_domain: String,

    /// Listing page scanned for categories missing from the seed list
    #[serde(default = "defaults::items_index_url")]
    pub items_index_url: String,

    /// Base directory for downloaded images
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            asset_domain: defaults::asset_domain(),
            items_index_url: defaults::items_index_url(),
            output_dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn category_delay() -> u64 {
        800
    }
    pub fn page_delay() -> u64 {
        300
    }
    pub fn download_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Site defaults
    pub fn base_url() -> String {
        "https://dayz.fandom.com".into()
    }
    pub fn asset_domain() -> String {
        "static.wikia.nocookie.net".into()
    }
    pub fn items_index_url() -> String {
        "https://dayz.fandom.com/wiki/Category:Items".into()
    }
    pub fn output_dir() -> String {
        "dayz_items".into()
    }

    // Category seed list. Broad categories first, then subcategories for
    // finer-grained classification.
    pub fn categories() -> Vec<String> {
        [
            // Primary categories
            "Category:Weapons",
            "Category:Equipment",
            "Category:Food",
            "Category:Medical_Items",
            "Category:Clothing",
            // Weapon subcategories
            "Category:Assault_Rifles",
            "Category:Sniper_Rifles",
            "Category:Shotguns",
            "Category:Submachine_Guns",
            "Category:Pistols",
            "Category:Melee_Weapons",
            "Category:Ammunition",
            "Category:Magazines",
            "Category:Weapon_Attachments",
            // Equipment subcategories
            "Category:Backpacks",
            "Category:Vests",
            "Category:Helmets",
            "Category:Eyewear",
            "Category:Masks",
            "Category:Hats",
            "Category:Tools",
            "Category:Electronics",
            "Category:Base_Building",
            // Clothing subcategories
            "Category:Tops",
            "Category:Bottoms",
            "Category:Shoes",
            "Category:Gloves",
            "Category:Bags",
            // Food and consumables
            "Category:Canned_Food",
            "Category:Fresh_Food",
            "Category:Drinks",
            "Category:Cooking",
            // Miscellaneous
            "Category:Containers",
            "Category:Resources",
            "Category:Books",
            "Category:Key_Cards",
            "Category:Vehicle_Parts",
            "Category:Seeds",
        ]
        .iter()
        .map(|name| format!("{}/wiki/{}", base_url(), name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_seed_targets_the_wiki() {
        let config = Config::default();
        assert!(config.categories.len() > 30);
        assert!(
            config
                .categories
                .iter()
                .all(|url| url.starts_with("https://dayz.fandom.com/wiki/Category:"))
        );
    }
}
