//! Documentation provider abstraction and resolver.
//!
//! A [`DocumentationProvider`] turns a [`DocumentationReference`] into text.
//! [`DocumentationService`] pairs a provider with the id derivation rules in
//! [`api_catalog_core::doc_id`] and is the optional collaborator handed to
//! the [`CatalogService`](crate::service::CatalogService).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │         DocumentationService         │
//! │  derive_id / find_by_id (pure)       │
//! │  content / validate ──┐              │
//! └───────────────────────┼──────────────┘
//!                         ▼
//!            dyn DocumentationProvider
//!            ┌──────────────────────┐
//!            │ GithubProvider       │
//!            │ (custom test doubles)│
//!            └──────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use api_catalog_core::doc_id::{derive_doc_id, find_doc_by_id};
use api_catalog_core::models::DocumentationReference;

use crate::error::CatalogResult;

/// Resolves documentation references to text.
///
/// Implementations contain their own failures: network and parse problems
/// come back as `Ok(None)` or `false`. The only error allowed out of
/// [`fetch_content`](DocumentationProvider::fetch_content) is a reference
/// tagged with a provider the implementation does not serve.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use api_catalog::documentation::DocumentationProvider;
/// use api_catalog::error::CatalogResult;
/// use api_catalog_core::models::DocumentationReference;
///
/// pub struct StaticProvider;
///
/// #[async_trait]
/// impl DocumentationProvider for StaticProvider {
///     fn name(&self) -> &str { "static" }
///
///     async fn fetch_content(&self, _doc: &DocumentationReference) -> CatalogResult<Option<String>> {
///         Ok(Some("# Hello".to_string()))
///     }
///
///     async fn validate_access(&self, _doc: &DocumentationReference) -> bool {
///         true
///     }
/// }
/// ```
#[async_trait]
pub trait DocumentationProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Fetch the referenced file's text, or `None` if it cannot be retrieved.
    async fn fetch_content(&self, doc: &DocumentationReference) -> CatalogResult<Option<String>>;

    /// Check that the reference points at a single reachable file.
    async fn validate_access(&self, doc: &DocumentationReference) -> bool;
}

#[derive(Clone)]
pub struct DocumentationService {
    provider: Arc<dyn DocumentationProvider>,
}

impl DocumentationService {
    pub fn new(provider: Arc<dyn DocumentationProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn content(&self, doc: &DocumentationReference) -> CatalogResult<Option<String>> {
        self.provider.fetch_content(doc).await
    }

    pub async fn validate(&self, doc: &DocumentationReference) -> bool {
        self.provider.validate_access(doc).await
    }

    pub fn derive_id(&self, name: &str) -> String {
        derive_doc_id(name)
    }

    pub fn find_by_id<'a>(
        &self,
        docs: &'a [DocumentationReference],
        doc_id: &str,
    ) -> Option<&'a DocumentationReference> {
        find_doc_by_id(docs, doc_id)
    }
}
