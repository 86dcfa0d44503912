//! # API Catalog Core
//!
//! Shared, I/O-free logic for API Catalog: descriptor models, the
//! [`store::DescriptorStore`] abstraction, the in-memory descriptor table
//! with its filter and ordering rules, specification location
//! classification, and documentation id derivation.
//!
//! This crate contains no tokio, reqwest, or filesystem access. Backends
//! that read files or talk to the network live in the `api-catalog` crate.

pub mod doc_id;
pub mod location;
pub mod models;
pub mod store;
