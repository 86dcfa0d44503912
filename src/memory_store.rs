//! In-memory [`DescriptorStore`] for tests and ephemeral catalogs.
//!
//! Nothing is persisted. Specification locations are still resolved
//! against an [`AssetRoot`], so it satisfies the same contract as the file
//! store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use api_catalog_core::models::{ApiDescriptor, ApiUpdate, ListFilter, ListOrder, NewApi};
use api_catalog_core::store::{DescriptorStore, DescriptorTable, ResolvedSpec};

use crate::assets::AssetRoot;

pub struct InMemoryStore {
    table: RwLock<DescriptorTable>,
    assets: AssetRoot,
}

impl InMemoryStore {
    pub fn new(assets: AssetRoot) -> Self {
        Self::with_table(DescriptorTable::new(), assets)
    }

    /// Start from existing records, e.g. fixtures parsed with
    /// [`DescriptorTable::from_json`].
    pub fn with_table(table: DescriptorTable, assets: AssetRoot) -> Self {
        Self {
            table: RwLock::new(table),
            assets,
        }
    }
}

#[async_trait]
impl DescriptorStore for InMemoryStore {
    async fn list_all(&self, filter: &ListFilter, order: ListOrder) -> Result<Vec<ApiDescriptor>> {
        Ok(self.table.read().await.list(filter, order))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiDescriptor>> {
        Ok(self.table.read().await.get(id).cloned())
    }

    async fn create(&self, data: NewApi) -> Result<ApiDescriptor> {
        Ok(self.table.write().await.create(data, Utc::now()))
    }

    async fn update(&self, id: &str, update: ApiUpdate) -> Result<Option<ApiDescriptor>> {
        Ok(self.table.write().await.update(id, update, Utc::now()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.table.write().await.remove(id))
    }

    async fn get_specification_reference(&self, id: &str) -> Option<ResolvedSpec> {
        let location = self.table.read().await.get(id)?.spec_location.clone();
        self.assets.resolve_spec(&location).await
    }
}
