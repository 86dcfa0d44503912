//! JSON-file-backed [`DescriptorStore`].
//!
//! The backing file is a single JSON object keyed by descriptor id:
//!
//! ```json
//! {
//!   "6f1c…": {
//!     "id": "6f1c…",
//!     "name": "Petstore",
//!     "team": "zoo",
//!     "specLocation": "/specs/petstore.json",
//!     "createdAt": "2026-01-04T10:00:00Z",
//!     "updatedAt": "2026-01-04T10:00:00Z",
//!     "docs": []
//!   }
//! }
//! ```
//!
//! # Loading
//!
//! The file is read lazily on the first operation and never again. A
//! missing, unreadable, or malformed file boots the store empty instead of
//! failing. A malformed file is first copied to a sibling `.bak`, since the
//! next successful mutation replaces it.
//!
//! # Writing
//!
//! Every mutation serializes the whole table to a sibling `.tmp` file and
//! renames it into place. The in-memory table only changes after the write
//! succeeds. There is no cross-process locking: concurrent processes
//! writing the same file overwrite each other (last writer wins).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

use api_catalog_core::models::{ApiDescriptor, ApiUpdate, ListFilter, ListOrder, NewApi};
use api_catalog_core::store::{DescriptorStore, DescriptorTable, ResolvedSpec};

use crate::assets::AssetRoot;

pub struct JsonFileStore {
    path: PathBuf,
    assets: AssetRoot,
    state: OnceCell<RwLock<DescriptorTable>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, assets: AssetRoot) -> Self {
        Self {
            path: path.into(),
            assets,
            state: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.state.initialized()
    }

    async fn table(&self) -> &RwLock<DescriptorTable> {
        self.state
            .get_or_init(|| async { RwLock::new(load_table(&self.path).await) })
            .await
    }

    async fn persist(&self, table: &DescriptorTable) -> Result<()> {
        let json = table
            .to_json()
            .with_context(|| "Failed to serialize descriptors")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let tmp = sibling_path(&self.path, ".tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), records = table.len(), "Persisted descriptors");
        Ok(())
    }
}

async fn load_table(path: &Path) -> DescriptorTable {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No descriptor file yet, starting empty");
            return DescriptorTable::new();
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to read descriptor file, starting empty"
            );
            return DescriptorTable::new();
        }
    };

    match DescriptorTable::from_json(&content) {
        Ok(table) => {
            debug!(path = %path.display(), records = table.len(), "Loaded descriptors");
            table
        }
        Err(e) => {
            let dropped = serde_json::from_str::<serde_json::Value>(&content)
                .ok()
                .and_then(|v| v.as_object().map(|records| records.len()));
            warn!(
                path = %path.display(),
                error = %e,
                dropped_records = ?dropped,
                "Malformed descriptor file, starting empty"
            );
            back_up(path).await;
            DescriptorTable::new()
        }
    }
}

async fn back_up(path: &Path) {
    let backup = sibling_path(path, ".bak");
    match tokio::fs::copy(path, &backup).await {
        Ok(_) => {
            warn!(backup = %backup.display(), "Saved a copy of the rejected descriptor file")
        }
        Err(e) => {
            warn!(backup = %backup.display(), error = %e, "Failed to back up descriptor file")
        }
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "apis.json".into());
    name.push(suffix);
    path.with_file_name(name)
}

#[async_trait]
impl DescriptorStore for JsonFileStore {
    async fn list_all(&self, filter: &ListFilter, order: ListOrder) -> Result<Vec<ApiDescriptor>> {
        Ok(self.table().await.read().await.list(filter, order))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiDescriptor>> {
        Ok(self.table().await.read().await.get(id).cloned())
    }

    async fn create(&self, data: NewApi) -> Result<ApiDescriptor> {
        let mut table = self.table().await.write().await;
        let mut next = table.clone();
        let api = next.create(data, Utc::now());
        self.persist(&next).await?;
        *table = next;
        Ok(api)
    }

    async fn update(&self, id: &str, update: ApiUpdate) -> Result<Option<ApiDescriptor>> {
        let mut table = self.table().await.write().await;
        if table.get(id).is_none() {
            return Ok(None);
        }
        let mut next = table.clone();
        let api = next.update(id, update, Utc::now());
        self.persist(&next).await?;
        *table = next;
        Ok(api)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut table = self.table().await.write().await;
        if table.get(id).is_none() {
            return Ok(false);
        }
        let mut next = table.clone();
        next.remove(id);
        self.persist(&next).await?;
        *table = next;
        Ok(true)
    }

    async fn get_specification_reference(&self, id: &str) -> Option<ResolvedSpec> {
        let location = self.table().await.read().await.get(id)?.spec_location.clone();
        self.assets.resolve_spec(&location).await
    }
}
