//! Process wiring: builds a [`CatalogService`] from [`Config`].
//!
//! All collaborators are constructed here and injected explicitly; nothing
//! in the library reaches for globals.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::assets::AssetRoot;
use crate::config::Config;
use crate::documentation::DocumentationService;
use crate::github::GithubProvider;
use crate::json_store::JsonFileStore;
use crate::service::CatalogService;
use crate::summarize::create_summarizer;

/// Build the production service: JSON file store, optional GitHub
/// documentation provider, and the configured summarizer.
pub fn build_service(config: &Config) -> Result<CatalogService> {
    let assets = AssetRoot::new(config.assets.root.clone());
    let store = Arc::new(JsonFileStore::new(config.store.path.clone(), assets));

    let documentation = match &config.github {
        Some(github) => {
            let provider = GithubProvider::new(github)?;
            info!(api_base = %github.api_base, "GitHub documentation provider enabled");
            Some(DocumentationService::new(Arc::new(provider)))
        }
        None => {
            info!("GitHub documentation provider not configured");
            None
        }
    };

    let summarizer = create_summarizer(&config.summarizer)?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()?;

    Ok(
        CatalogService::new(store, documentation, summarizer, http).with_summarize_timeout(
            Duration::from_secs(config.summarizer.timeout_secs),
        ),
    )
}
