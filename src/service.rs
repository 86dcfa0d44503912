//! Catalog service: the orchestration layer over the descriptor store,
//! documentation provider, and summarizer.
//!
//! # Result conventions
//!
//! | Situation | Surfaced as |
//! |-----------|-------------|
//! | Unknown API id or documentation id | `None` / `false` |
//! | Unreadable file, failed fetch, provider error | `None` / `false` (logged) |
//! | Documentation provider not configured | [`CatalogError::NotConfigured`] |
//! | Rejected create/update | [`CatalogError::Validation`] |
//! | Store failed to persist | [`CatalogError::Store`] |
//!
//! The one exception is [`validate_documentation`](CatalogService::validate_documentation),
//! which folds "not configured" into `false`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use api_catalog_core::doc_id::{derive_doc_id, find_doc_id_collisions};
use api_catalog_core::models::{
    ApiDescriptor, ApiUpdate, DocumentationPage, DocumentationReference, ListFilter, ListOrder,
    NewApi,
};
use api_catalog_core::store::{DescriptorStore, ResolvedSpec};

use crate::documentation::DocumentationService;
use crate::error::{CatalogError, CatalogResult};
use crate::summarize::Summarizer;

/// Returned by [`CatalogService::summarize_specification`] when there is no
/// specification content to summarize.
pub const SPEC_UNAVAILABLE_SUMMARY: &str = "Could not retrieve API specification to summarize.";

/// Returned by [`CatalogService::summarize_specification`] when the
/// summarizer fails or times out.
pub const SUMMARY_FAILED: &str = "Failed to generate summary for the API.";

const DEFAULT_SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(60);

pub struct CatalogService {
    store: Arc<dyn DescriptorStore>,
    documentation: Option<DocumentationService>,
    summarizer: Arc<dyn Summarizer>,
    http: reqwest::Client,
    summarize_timeout: Duration,
}

impl CatalogService {
    /// Wire a service from its collaborators.
    ///
    /// `http` is used for remote specification fetches; its timeout bounds
    /// each fetch. Pass `None` for `documentation` when no provider is
    /// available in this deployment.
    pub fn new(
        store: Arc<dyn DescriptorStore>,
        documentation: Option<DocumentationService>,
        summarizer: Arc<dyn Summarizer>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            store,
            documentation,
            summarizer,
            http,
            summarize_timeout: DEFAULT_SUMMARIZE_TIMEOUT,
        }
    }

    pub fn with_summarize_timeout(mut self, timeout: Duration) -> Self {
        self.summarize_timeout = timeout;
        self
    }

    pub fn has_documentation(&self) -> bool {
        self.documentation.is_some()
    }

    // ─── Descriptors ───────────────────────────────────────────────────

    pub async fn list_apis(
        &self,
        filter: &ListFilter,
        order: ListOrder,
    ) -> CatalogResult<Vec<ApiDescriptor>> {
        Ok(self.store.list_all(filter, order).await?)
    }

    pub async fn get_api(&self, id: &str) -> CatalogResult<Option<ApiDescriptor>> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// Create a descriptor.
    ///
    /// Rejects empty names and documentation lists whose names derive to
    /// the same id (or to an empty id), since such entries could not be
    /// linked to individually.
    pub async fn create_api(&self, data: NewApi) -> CatalogResult<ApiDescriptor> {
        validate_name(&data.name)?;
        validate_docs(&data.docs)?;
        Ok(self.store.create(data).await?)
    }

    /// Partially update a descriptor. Supplied fields obey the same rules
    /// as [`create_api`](Self::create_api).
    pub async fn update_api(
        &self,
        id: &str,
        update: ApiUpdate,
    ) -> CatalogResult<Option<ApiDescriptor>> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        if let Some(docs) = &update.docs {
            validate_docs(docs)?;
        }
        Ok(self.store.update(id, update).await?)
    }

    pub async fn delete_api(&self, id: &str) -> CatalogResult<bool> {
        Ok(self.store.delete(id).await?)
    }

    // ─── Specifications ────────────────────────────────────────────────

    /// Resolve a descriptor's specification to text.
    ///
    /// Local content is returned as read by the store; remote URLs are
    /// fetched with a plain GET. Any failure yields `None`.
    pub async fn get_specification_content(&self, id: &str) -> Option<String> {
        match self.store.get_specification_reference(id).await? {
            ResolvedSpec::Content(content) => Some(content),
            ResolvedSpec::Remote(url) => self.fetch_remote(&url).await,
        }
    }

    async fn fetch_remote(&self, url: &str) -> Option<String> {
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "Error fetching spec from URL");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Failed to fetch spec from URL");
            return None;
        }

        match response.text().await {
            Ok(body) => {
                debug!(url, bytes = body.len(), "Fetched remote spec");
                Some(body)
            }
            Err(e) => {
                warn!(url, error = %e, "Error reading spec response body");
                None
            }
        }
    }

    /// The stored specification location, unresolved.
    pub async fn get_raw_specification_location(&self, id: &str) -> CatalogResult<Option<String>> {
        Ok(self.get_api(id).await?.map(|api| api.spec_location))
    }

    /// Summarize a descriptor's specification.
    ///
    /// Never fails: returns [`SPEC_UNAVAILABLE_SUMMARY`] when there is no
    /// content or the content is empty (without calling the summarizer) and
    /// [`SUMMARY_FAILED`] when the summarizer errors or exceeds its timeout.
    pub async fn summarize_specification(&self, id: &str) -> String {
        let content = self
            .get_specification_content(id)
            .await
            .filter(|c| !c.trim().is_empty());
        let Some(content) = content else {
            return SPEC_UNAVAILABLE_SUMMARY.to_string();
        };

        let summary = self.summarizer.summarize(&content);
        match tokio::time::timeout(self.summarize_timeout, summary).await {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                warn!(id, summarizer = self.summarizer.name(), error = %e, "Error summarizing API");
                SUMMARY_FAILED.to_string()
            }
            Err(_) => {
                warn!(id, timeout = ?self.summarize_timeout, "Summarizer timed out");
                SUMMARY_FAILED.to_string()
            }
        }
    }

    // ─── Documentation ─────────────────────────────────────────────────

    fn documentation(&self) -> CatalogResult<&DocumentationService> {
        self.documentation
            .as_ref()
            .ok_or(CatalogError::NotConfigured("Documentation service"))
    }

    /// Fetch one documentation page of an API.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotConfigured`] when no documentation provider was
    /// supplied, and [`CatalogError::UnsupportedProvider`] when the
    /// reference's provider tag is not served by it. A missing API,
    /// reference, or content is `Ok(None)`.
    pub async fn get_documentation(
        &self,
        api_id: &str,
        doc_id: &str,
    ) -> CatalogResult<Option<DocumentationPage>> {
        let documentation = self.documentation()?;

        let Some(api) = self.get_api(api_id).await? else {
            return Ok(None);
        };
        let Some(reference) = documentation.find_by_id(&api.docs, doc_id) else {
            return Ok(None);
        };

        let content = documentation.content(reference).await?;
        Ok(content.map(|content| DocumentationPage {
            reference: reference.clone(),
            content,
        }))
    }

    /// Whether a documentation page of an API is reachable.
    ///
    /// `false` covers every negative outcome, including a deployment
    /// without a documentation provider.
    pub async fn validate_documentation(&self, api_id: &str, doc_id: &str) -> bool {
        let Some(documentation) = self.documentation.as_ref() else {
            return false;
        };

        let api = match self.store.get_by_id(api_id).await {
            Ok(Some(api)) => api,
            Ok(None) => return false,
            Err(e) => {
                warn!(api_id, error = %e, "Failed to load API for documentation validation");
                return false;
            }
        };

        match documentation.find_by_id(&api.docs, doc_id) {
            Some(reference) => documentation.validate(reference).await,
            None => false,
        }
    }

    /// The stable id links use for a documentation page with this name.
    pub fn generate_documentation_id(&self, name: &str) -> CatalogResult<String> {
        Ok(self.documentation()?.derive_id(name))
    }
}

fn validate_name(name: &str) -> CatalogResult<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_docs(docs: &[DocumentationReference]) -> CatalogResult<()> {
    if let Some(doc) = docs.iter().find(|d| derive_doc_id(&d.name).is_empty()) {
        return Err(CatalogError::Validation(format!(
            "documentation name '{}' has no letters or digits",
            doc.name
        )));
    }
    let collisions = find_doc_id_collisions(docs);
    if !collisions.is_empty() {
        return Err(CatalogError::Validation(format!(
            "documentation names collide on derived id: {}",
            collisions.join(", ")
        )));
    }
    Ok(())
}
