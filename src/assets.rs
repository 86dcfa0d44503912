//! Local asset root.
//!
//! Specification locations that start with `/` or are bare filenames are
//! resolved beneath a fixed directory (by default `./public`). Reads never
//! leave that directory: locations containing `..` are refused.

use std::path::{Component, Path, PathBuf};

use api_catalog_core::location::SpecLocation;
use api_catalog_core::store::ResolvedSpec;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a stored location onto a path under the root.
    ///
    /// A leading `/` is relative to the root, not the filesystem. Returns
    /// `None` for empty locations and for anything that would climb out of
    /// the root.
    pub fn resolve(&self, location: &str) -> Option<PathBuf> {
        let relative = Path::new(location.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        let mut pushed = false;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    pushed = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        pushed.then_some(resolved)
    }

    /// Read a location's file content as UTF-8 text.
    ///
    /// Missing, unreadable, or out-of-root files yield `None` and a warning.
    pub async fn read_text(&self, location: &str) -> Option<String> {
        let Some(path) = self.resolve(location) else {
            warn!(location, "Refusing asset location outside the asset root");
            return None;
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "Read asset");
                Some(content)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read asset");
                None
            }
        }
    }

    /// Apply the specification resolution policy to a stored location.
    ///
    /// Remote URLs are handed back unfetched; local locations are read.
    pub async fn resolve_spec(&self, location: &str) -> Option<ResolvedSpec> {
        match SpecLocation::classify(location) {
            SpecLocation::Remote(url) => Some(ResolvedSpec::Remote(url.to_string())),
            SpecLocation::AssetPath(path) | SpecLocation::AssetFile(path) => {
                self.read_text(path).await.map(ResolvedSpec::Content)
            }
        }
    }
}
