//! Storage abstraction for API Catalog.
//!
//! The [`DescriptorStore`] trait defines every operation the catalog service
//! needs from persistence, enabling pluggable backends (JSON file,
//! in-memory, future relational stores) and test doubles that never touch
//! the service.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod table;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ApiDescriptor, ApiUpdate, ListFilter, ListOrder, NewApi};

pub use table::DescriptorTable;

/// Result of resolving a descriptor's specification location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSpec {
    /// The location was local and its file content has been read.
    Content(String),
    /// The location is an `http(s)` URL the caller still has to fetch.
    Remote(String),
}

/// Abstract descriptor store.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_all`](DescriptorStore::list_all) | Filtered, ordered listing |
/// | [`get_by_id`](DescriptorStore::get_by_id) | Single record lookup |
/// | [`create`](DescriptorStore::create) | Insert with a fresh id and timestamps |
/// | [`update`](DescriptorStore::update) | Partial merge, refreshes `updated_at` |
/// | [`delete`](DescriptorStore::delete) | Hard delete |
/// | [`get_specification_reference`](DescriptorStore::get_specification_reference) | Local read or remote URL |
///
/// Not-found is always `Ok(None)` / `Ok(false)`. `Err` is reserved for
/// persistence failures on mutation.
#[async_trait]
pub trait DescriptorStore: Send + Sync {
    /// Descriptors whose name contains the filter (case-insensitive), sorted
    /// by the requested field and direction.
    async fn list_all(&self, filter: &ListFilter, order: ListOrder) -> Result<Vec<ApiDescriptor>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiDescriptor>>;

    /// Persist a new descriptor. The returned record is the stored one.
    async fn create(&self, data: NewApi) -> Result<ApiDescriptor>;

    /// Merge `update` over an existing record. `Ok(None)` if `id` is unknown.
    async fn update(&self, id: &str, update: ApiUpdate) -> Result<Option<ApiDescriptor>>;

    /// `Ok(true)` if a record existed and was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Resolve the stored specification location.
    ///
    /// Local locations (leading `/` or a bare filename) are read from the
    /// asset root and returned as [`ResolvedSpec::Content`]; `http(s)` URLs
    /// come back unfetched as [`ResolvedSpec::Remote`]. An unknown id or an
    /// unreadable file yields `None`.
    async fn get_specification_reference(&self, id: &str) -> Option<ResolvedSpec>;
}
