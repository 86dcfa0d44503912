//! # API Catalog
//!
//! **A catalog of API descriptors that resolves specification and
//! documentation content on demand.**
//!
//! Each descriptor names an API, its owning team, where its specification
//! lives (a local asset, a bare filename, or a remote URL), and a list of
//! documentation files hosted on GitHub. The catalog stores descriptors in a
//! JSON file and resolves the referenced content when asked.
//!
//! ## Architecture
//!
//! ```text
//!                ┌────────────────────┐
//!   CLI / HTTP ─▶│   CatalogService   │──▶ Summarizer (optional LLM)
//!                └───┬────────────┬───┘
//!                    │            │
//!                    ▼            ▼
//!        ┌────────────────┐  ┌──────────────────────┐
//!        │DescriptorStore │  │ DocumentationService │
//!        │ JSON / memory  │  │  GitHub contents API │
//!        └───────┬────────┘  └──────────────────────┘
//!                ▼
//!        asset root / remote URL
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! apicat create --name Petstore --team zoo --spec /specs/petstore.json
//! apicat list --name pet
//! apicat spec <id>
//! apicat doc <id> getting-started
//! apicat serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`error`] | `CatalogError`, the service boundary error type |
//! | [`assets`] | Asset root: local specification resolution |
//! | [`json_store`] | JSON-file descriptor store with lazy loading |
//! | [`memory_store`] | In-memory descriptor store |
//! | [`documentation`] | `DocumentationProvider` trait and `DocumentationService` |
//! | [`github`] | GitHub documentation provider |
//! | [`summarize`] | `Summarizer` trait, disabled and OpenAI implementations |
//! | [`service`] | `CatalogService` orchestration |
//! | [`bootstrap`] | Builds the service from configuration |
//! | [`server`] | JSON HTTP API (Axum) with CORS |
//!
//! Models, the store trait, ordering rules and documentation id derivation
//! live in the `api-catalog-core` crate; the commonly used types are
//! re-exported here.

pub mod assets;
pub mod bootstrap;
pub mod config;
pub mod documentation;
pub mod error;
pub mod github;
pub mod json_store;
pub mod memory_store;
pub mod server;
pub mod service;
pub mod summarize;

pub use api_catalog_core::models::{
    ApiDescriptor, ApiUpdate, DocProvider, DocumentationPage, DocumentationReference, ListFilter,
    ListOrder, NewApi, SortDirection, SortField,
};
pub use api_catalog_core::store::{DescriptorStore, ResolvedSpec};
pub use documentation::{DocumentationProvider, DocumentationService};
pub use error::{CatalogError, CatalogResult};
pub use service::CatalogService;
