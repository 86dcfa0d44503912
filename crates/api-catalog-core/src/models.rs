//! Core data models for API Catalog.
//!
//! These types describe catalog records as they are persisted, the inputs
//! accepted by create and partial-update operations, and the filter and
//! ordering options used when listing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog record describing one API.
///
/// `id`, `created_at` and `updated_at` are assigned by the store and are
/// never taken from caller input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescriptor {
    pub id: String,
    pub name: String,
    pub team: String,
    /// Where the machine-readable specification lives: an absolute asset
    /// path (`/specs/a.json`), a URL, or a bare filename under the asset root.
    #[serde(alias = "openAPIUrl", alias = "documentationUrl")]
    pub spec_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub docs: Vec<DocumentationReference>,
}

/// A pointer to one auxiliary documentation file.
///
/// Not independently identified: its id is derived from `name` by
/// [`derive_doc_id`](crate::doc_id::derive_doc_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationReference {
    /// URL of a single text file (not a directory).
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub provider: DocProvider,
}

/// Provider tag of a documentation reference.
///
/// The supported set is closed. Tags outside it are kept as
/// [`DocProvider::Unsupported`] so a descriptor loaded from disk still
/// round-trips and the mismatch can be reported when the reference is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocProvider {
    Github,
    Unsupported(String),
}

impl DocProvider {
    pub fn as_str(&self) -> &str {
        match self {
            DocProvider::Github => "github",
            DocProvider::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for DocProvider {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "github" => DocProvider::Github,
            _ => DocProvider::Unsupported(tag),
        }
    }
}

impl From<DocProvider> for String {
    fn from(provider: DocProvider) -> Self {
        match provider {
            DocProvider::Github => "github".to_string(),
            DocProvider::Unsupported(tag) => tag,
        }
    }
}

impl fmt::Display for DocProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a descriptor. Omits every store-assigned field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApi {
    pub name: String,
    pub team: String,
    #[serde(alias = "openAPIUrl", alias = "documentationUrl")]
    pub spec_location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub docs: Vec<DocumentationReference>,
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, alias = "openAPIUrl", alias = "documentationUrl")]
    pub spec_location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub docs: Option<Vec<DocumentationReference>>,
}

impl ApiUpdate {
    /// Merge the supplied fields over `record`.
    pub fn apply_to(self, record: &mut ApiDescriptor) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(team) = self.team {
            record.team = team;
        }
        if let Some(spec_location) = self.spec_location {
            record.spec_location = spec_location;
        }
        if let Some(description) = self.description {
            record.description = Some(description);
        }
        if let Some(docs) = self.docs {
            record.docs = docs;
        }
    }
}

/// Filter applied by [`DescriptorStore::list_all`](crate::store::DescriptorStore::list_all).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring of the descriptor name. Empty matches all.
    pub name_contains: Option<String>,
}

impl ListFilter {
    pub fn name_contains(needle: impl Into<String>) -> Self {
        Self {
            name_contains: Some(needle.into()),
        }
    }
}

/// Field a listing is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Team,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "team" => Ok(SortField::Team),
            other => Err(format!("unknown sort field: '{}' (expected name or team)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: '{}' (expected asc or desc)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl ListOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// A resolved documentation page: the reference it came from plus its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationPage {
    pub reference: DocumentationReference,
    pub content: String,
}
