//! TOML configuration parsing and validation.
//!
//! ```toml
//! [store]
//! path = "./data/apis.json"
//!
//! [assets]
//! root = "./public"
//!
//! [github]                  # omit to run without documentation support
//! token_env = "GITHUB_TOKEN"
//!
//! [summarizer]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! ```
//!
//! Every section has defaults, so an empty file is a valid configuration
//! with documentation support disabled and summaries turned off.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Present only when documentation should be served from GitHub.
    #[serde(default)]
    pub github: Option<GithubConfig>,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/apis.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    #[serde(default = "default_asset_root")]
    pub root: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
        }
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("./public")
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Timeout for fetching remote specifications.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
    /// Host documentation URLs must point at.
    #[serde(default = "default_github_web_host")]
    pub web_host: String,
    /// Environment variable holding an optional access token.
    #[serde(default = "default_github_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
            web_host: default_github_web_host(),
            token_env: default_github_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_github_web_host() -> String {
    "github.com".to_string()
}
fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerConfig {
    #[serde(default = "default_summarizer_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_summarizer_url")]
    pub url: String,
    #[serde(default = "default_summarizer_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            provider: default_summarizer_provider(),
            model: None,
            url: default_summarizer_url(),
            timeout_secs: default_summarizer_timeout_secs(),
        }
    }
}

impl SummarizerConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_summarizer_provider() -> String {
    "disabled".to_string()
}
fn default_summarizer_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_summarizer_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be > 0");
    }

    if let Some(github) = &config.github {
        if github.timeout_secs == 0 {
            anyhow::bail!("github.timeout_secs must be > 0");
        }
        if !(github.api_base.starts_with("http://") || github.api_base.starts_with("https://")) {
            anyhow::bail!(
                "github.api_base must be an http(s) URL, got '{}'",
                github.api_base
            );
        }
        if github.web_host.trim().is_empty() {
            anyhow::bail!("github.web_host must not be empty");
        }
    }

    if config.summarizer.timeout_secs == 0 {
        anyhow::bail!("summarizer.timeout_secs must be > 0");
    }

    match config.summarizer.provider.as_str() {
        "disabled" => {}
        "openai" => {
            if config.summarizer.model.is_none() {
                anyhow::bail!(
                    "summarizer.model must be specified when provider is '{}'",
                    config.summarizer.provider
                );
            }
        }
        other => anyhow::bail!(
            "Unknown summarizer provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    Ok(config)
}
