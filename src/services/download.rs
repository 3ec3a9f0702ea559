// src/services/download.rs

//! Idempotent image download.
//!
//! Resolves a filesystem target from the item name, variant label, and
//! category folder, then fetches and writes the image once. An existing
//! target file is the only "already processed" signal across runs.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client;

use crate::error::Result;
use crate::models::{DownloadOutcome, FolderPath};

/// Characters that are invalid in filenames on common filesystems.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Extensions accepted for downloaded files, without the dot.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Extension applied when none can be inferred.
const DEFAULT_EXTENSION: &str = "png";

/// Downloads image candidates into the categorized output tree.
pub struct Downloader {
    client: Client,
    base_dir: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            base_dir: base_dir.into(),
        }
    }

    /// Download one image, or skip it when the target already exists.
    ///
    /// Failures are resolved here: the outcome carries a success flag and
    /// never aborts the surrounding run.
    pub async fn download(
        &self,
        url: &str,
        item_name: &str,
        variant: &str,
        category: &FolderPath,
    ) -> DownloadOutcome {
        let folder = category.join_under(&self.base_dir);
        let target = folder.join(target_filename(item_name, variant, url));

        match self.fetch_to(url, &folder, &target).await {
            Ok(written) => {
                if written {
                    log::info!("Saved: {}/{}", category, file_name_of(&target));
                } else {
                    log::debug!("Skipped (already exists): {}", target.display());
                }
                DownloadOutcome {
                    target,
                    succeeded: true,
                }
            }
            Err(e) => {
                log::warn!("Download error for {}: {}", url, e);
                DownloadOutcome {
                    target,
                    succeeded: false,
                }
            }
        }
    }

    /// Returns `Ok(false)` when the target already existed, `Ok(true)` when
    /// the payload was fetched and written.
    async fn fetch_to(&self, url: &str, folder: &Path, target: &Path) -> Result<bool> {
        tokio::fs::create_dir_all(folder).await?;

        if tokio::fs::try_exists(target).await? {
            return Ok(false);
        }

        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(target, &bytes).await?;
        Ok(true)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compose the target filename from item name and variant label.
///
/// The variant is appended only when it adds information beyond the item
/// name itself.
pub fn target_filename(item_name: &str, variant: &str, url: &str) -> String {
    let raw = if !variant.is_empty() && !variant.eq_ignore_ascii_case(item_name) {
        format!("{item_name}_{variant}")
    } else {
        item_name.to_string()
    };
    ensure_image_extension(sanitize_filename(&raw), url)
}

/// Make a filename filesystem-safe.
///
/// Invalid characters become underscores, separator runs collapse to one
/// underscore, and an extensionless result gains `.png`.
pub fn sanitize_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| {
            if INVALID_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = separator_runs().replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        format!("{trimmed}.{DEFAULT_EXTENSION}")
    }
}

/// Compiled once; sanitization runs for every download job.
fn separator_runs() -> &'static Regex {
    static SEPARATOR_RUNS: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_RUNS.get_or_init(|| Regex::new(r"[_\s]+").expect("static pattern"))
}

/// Enforce an allowed image extension, inferring it from the URL's trailing
/// path segment when possible.
fn ensure_image_extension(filename: String, url: &str) -> String {
    let lower = filename.to_lowercase();
    if ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
    {
        return filename;
    }

    let url_ext = url
        .rsplit('.')
        .next()
        .and_then(|tail| tail.split('?').next())
        .and_then(|tail| tail.split('/').next())
        .unwrap_or("")
        .to_lowercase();

    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .unwrap_or(filename);

    if ALLOWED_EXTENSIONS.contains(&url_ext.as_str()) {
        format!("{stem}.{url_ext}")
    } else {
        format!("{stem}.{DEFAULT_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::categories::map_category;
    use tempfile::TempDir;

    /// Unroutable URL: any attempt to fetch it fails immediately.
    const DEAD_URL: &str = "http://127.0.0.1:1/image.png";

    fn downloader(dir: &TempDir) -> Downloader {
        Downloader::new(Client::new(), dir.path())
    }

    #[test]
    fn sanitize_strips_every_invalid_character() {
        let cleaned = sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#);
        for c in INVALID_FILENAME_CHARS {
            assert!(!cleaned.contains(*c), "found {c:?} in {cleaned:?}");
        }
    }

    #[test]
    fn sanitize_collapses_separator_runs() {
        assert_eq!(sanitize_filename("FX__45  Mag.png"), "FX_45_Mag.png");
        assert_eq!(sanitize_filename("__Canteen__"), "Canteen.png");
    }

    #[test]
    fn separator_pattern_is_compiled_once() {
        assert!(std::ptr::eq(separator_runs(), separator_runs()));
    }

    #[test]
    fn sanitize_appends_png_when_extensionless() {
        assert_eq!(sanitize_filename("Canteen"), "Canteen.png");
    }

    #[test]
    fn extension_inferred_from_url() {
        // A non-image extension is replaced by the URL's trailing segment.
        assert_eq!(
            target_filename("Photo.webp", "", "https://cdn.example/img/Photo.jpg/revision/latest"),
            "Photo.jpg"
        );
        // When the URL offers nothing usable either, fall back to .png.
        assert_eq!(
            target_filename("Photo.webp", "", "https://cdn.example/img/Photo.webp"),
            "Photo.png"
        );
    }

    #[test]
    fn variant_appended_only_when_distinct() {
        assert_eq!(
            target_filename("Hoodie", "Hoodie Green", "x.png"),
            "Hoodie_Hoodie_Green.png"
        );
        assert_eq!(target_filename("Hoodie", "hoodie", "x.png"), "Hoodie.png");
        assert_eq!(target_filename("Hoodie", "", "x.png"), "Hoodie.png");
    }

    #[tokio::test]
    async fn existing_target_short_circuits_without_network() {
        let tmp = TempDir::new().unwrap();
        let category = map_category("pistols");

        let folder = category.join_under(tmp.path());
        tokio::fs::create_dir_all(&folder).await.unwrap();
        tokio::fs::write(folder.join("FX-45.png"), b"bytes")
            .await
            .unwrap();

        // The URL is unroutable: success proves no fetch was attempted.
        let outcome = downloader(&tmp)
            .download(DEAD_URL, "FX-45", "", &category)
            .await;
        assert!(outcome.succeeded);
        assert_eq!(
            tokio::fs::read(&outcome.target).await.unwrap(),
            b"bytes".to_vec()
        );
    }

    #[tokio::test]
    async fn failed_fetch_reports_failure_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let category = map_category("pistols");

        let outcome = downloader(&tmp)
            .download(DEAD_URL, "FX-45", "", &category)
            .await;
        assert!(!outcome.succeeded);
        assert!(!outcome.target.exists());

        // The category folder itself is still created.
        assert!(category.join_under(tmp.path()).exists());
    }

    #[tokio::test]
    async fn folder_creation_is_recursive_and_idempotent() {
        let tmp = TempDir::new().unwrap();
        let category = map_category("assault_rifles");

        let d = downloader(&tmp);
        d.download(DEAD_URL, "M4-A1", "", &category).await;
        d.download(DEAD_URL, "M4-A1", "", &category).await;

        assert!(tmp.path().join("Weapons").join("Assault_Rifles").exists());
    }
}
