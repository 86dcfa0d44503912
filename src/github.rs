//! GitHub documentation provider.
//!
//! Serves [`DocumentationReference`]s tagged `github` whose URL has the
//! browser "blob" shape:
//!
//! ```text
//! https://github.com/<owner>/<repo>/blob/<revision>/<path...>
//! ```
//!
//! Content is retrieved through the repository contents API
//! (`GET /repos/{owner}/{repo}/contents/{path}?ref={revision}`), which
//! answers with either a file entry carrying base64 content or an array for
//! a directory. Only single files are accepted.
//!
//! # Authentication
//!
//! A token is read from the environment variable named by
//! `github.token_env` (default `GITHUB_TOKEN`). It is optional: public
//! repositories work without one, at a lower rate limit.
//!
//! # Failure handling
//!
//! Malformed URLs, transport errors, non-2xx answers, directories, and
//! undecodable content are logged and reported as `None` / `false`.

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::{debug, warn};

use api_catalog_core::models::{DocProvider, DocumentationReference};

use crate::config::GithubConfig;
use crate::documentation::DocumentationProvider;
use crate::error::{CatalogError, CatalogResult};

/// Location of one file inside a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubLocation {
    pub owner: String,
    pub repo: String,
    pub revision: String,
    pub path: String,
}

/// Parse a `https://<host>/<owner>/<repo>/blob/<revision>/<path...>` URL.
///
/// Requires at least five non-empty path segments with `blob` third, and
/// the host must equal `web_host`.
pub fn parse_github_url(url: &str, web_host: &str) -> Option<GithubLocation> {
    let parsed = reqwest::Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str()? != web_host {
        return None;
    }

    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();
    if segments.len() < 5 || segments[2] != "blob" {
        return None;
    }

    Some(GithubLocation {
        owner: segments[0].to_string(),
        repo: segments[1].to_string(),
        revision: segments[3].to_string(),
        path: segments[4..].join("/"),
    })
}

/// Contents API answer: a directory listing or a single entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Directory(Vec<serde::de::IgnoredAny>),
    Entry(ContentEntry),
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Decode a file entry's base64 payload to UTF-8 text.
///
/// GitHub wraps the base64 at 60 columns, so whitespace is stripped first.
fn decode_entry(entry: &ContentEntry) -> Option<String> {
    if entry.kind != "file" {
        return None;
    }
    let raw = entry.content.as_deref().filter(|c| !c.is_empty())?;
    if let Some(encoding) = entry.encoding.as_deref() {
        if encoding != "base64" {
            return None;
        }
    }

    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}

pub struct GithubProvider {
    client: reqwest::Client,
    api_base: String,
    web_host: String,
    token: Option<String>,
}

impl GithubProvider {
    /// Build a provider from configuration, picking up the token from the
    /// environment if one is set.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            debug!(
                env = %config.token_env,
                "No GitHub token in environment, using unauthenticated requests"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("api-catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            web_host: config.web_host.clone(),
            token,
        })
    }

    fn locate(&self, doc: &DocumentationReference) -> Option<GithubLocation> {
        let location = parse_github_url(&doc.url, &self.web_host);
        if location.is_none() {
            warn!(url = %doc.url, "Invalid GitHub URL format");
        }
        location
    }

    async fn get_contents(&self, location: &GithubLocation) -> Result<ContentsResponse> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, location.owner, location.repo, location.path
        );

        let mut request = self
            .client
            .get(&url)
            .query(&[("ref", location.revision.as_str())])
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            bail!("GitHub API error {} for {}", status, url);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DocumentationProvider for GithubProvider {
    fn name(&self) -> &str {
        "github"
    }

    async fn fetch_content(&self, doc: &DocumentationReference) -> CatalogResult<Option<String>> {
        if doc.provider != DocProvider::Github {
            return Err(CatalogError::UnsupportedProvider(doc.provider.to_string()));
        }

        let Some(location) = self.locate(doc) else {
            return Ok(None);
        };

        match self.get_contents(&location).await {
            Ok(ContentsResponse::Directory(_)) => {
                warn!(url = %doc.url, "Path points to a directory, not a file");
                Ok(None)
            }
            Ok(ContentsResponse::Entry(entry)) => {
                let content = decode_entry(&entry);
                if content.is_none() {
                    warn!(url = %doc.url, kind = %entry.kind, "Invalid file or no content found");
                }
                Ok(content)
            }
            Err(e) => {
                warn!(url = %doc.url, error = %e, "Error fetching documentation from GitHub");
                Ok(None)
            }
        }
    }

    async fn validate_access(&self, doc: &DocumentationReference) -> bool {
        if doc.provider != DocProvider::Github {
            return false;
        }

        let Some(location) = self.locate(doc) else {
            return false;
        };

        match self.get_contents(&location).await {
            Ok(ContentsResponse::Entry(entry)) => entry.kind == "file",
            Ok(ContentsResponse::Directory(_)) => false,
            Err(e) => {
                warn!(url = %doc.url, error = %e, "Error validating documentation access");
                false
            }
        }
    }
}
