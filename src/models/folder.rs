//! Hierarchical classification path for downloaded items.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A `/`-segmented folder path such as `Weapons/Assault_Rifles`.
///
/// Only the category mapper constructs these; everything downstream treats
/// them as opaque classification labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath(String);

impl FolderPath {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments in root-to-leaf order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Resolve this folder under a base directory.
    pub fn join_under(&self, base: &std::path::Path) -> PathBuf {
        let mut path = base.to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }
        path
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
