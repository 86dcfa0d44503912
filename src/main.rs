//! # API Catalog CLI (`apicat`)
//!
//! Command-line front end for the catalog: manage descriptors, resolve
//! specifications and documentation, and start the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! apicat --config ./config/catalog.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `apicat list` | List descriptors (filter by name, sort by name or team) |
//! | `apicat get <id>` | Print one descriptor as JSON |
//! | `apicat create` | Create a descriptor |
//! | `apicat update <id>` | Partially update a descriptor |
//! | `apicat delete <id>` | Delete a descriptor |
//! | `apicat spec <id>` | Print the resolved specification (`--raw` for its location) |
//! | `apicat summarize <id>` | Summarize the specification |
//! | `apicat doc <api-id> <doc-id>` | Print a documentation page |
//! | `apicat validate-doc <api-id> <doc-id>` | Check a documentation page is reachable |
//! | `apicat doc-id <name>` | Derive the id used to link a documentation page |
//! | `apicat serve` | Start the JSON HTTP API |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use api_catalog::bootstrap::build_service;
use api_catalog::config::{load_config, parse_config, Config};
use api_catalog::server::serve;
use api_catalog::{ApiUpdate, DocumentationReference, ListFilter, ListOrder, NewApi};
use api_catalog::{SortDirection, SortField};

const DEFAULT_CONFIG: &str = "./config/catalog.toml";

/// API Catalog CLI: catalog API descriptors and resolve their
/// specifications and documentation on demand.
#[derive(Parser)]
#[command(
    name = "apicat",
    about = "API Catalog: catalog API descriptors and resolve their specifications and documentation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/catalog.toml`. When the default file does not
    /// exist, built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List descriptors.
    List {
        /// Only descriptors whose name contains this text (case-insensitive).
        #[arg(long)]
        name: Option<String>,

        /// Sort field: `name` or `team`.
        #[arg(long, default_value = "name")]
        sort: SortField,

        /// Sort descending.
        #[arg(long)]
        desc: bool,
    },

    /// Print one descriptor as JSON.
    Get { id: String },

    /// Create a descriptor.
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        team: String,

        /// Specification location: `/path` under the asset root, a bare
        /// filename, or an `http(s)` URL.
        #[arg(long)]
        spec: String,

        #[arg(long)]
        description: Option<String>,

        /// JSON file holding an array of documentation references.
        #[arg(long)]
        docs_file: Option<PathBuf>,
    },

    /// Partially update a descriptor. Only the given fields change.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        team: Option<String>,

        #[arg(long)]
        spec: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// JSON file holding an array of documentation references.
        #[arg(long)]
        docs_file: Option<PathBuf>,
    },

    /// Delete a descriptor.
    Delete { id: String },

    /// Print the resolved specification.
    Spec {
        id: String,

        /// Print the stored location instead of fetching content.
        #[arg(long)]
        raw: bool,
    },

    /// Summarize the specification with the configured summarizer.
    Summarize { id: String },

    /// Print a documentation page.
    Doc { api_id: String, doc_id: String },

    /// Check that a documentation page is reachable.
    ValidateDoc { api_id: String, doc_id: String },

    /// Derive the id used to link a documentation page.
    DocId { name: String },

    /// Start the JSON HTTP API on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("api_catalog=debug,info")
        } else {
            EnvFilter::new("api_catalog=warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(cli.config.as_deref())?;
    let service = build_service(&config)?;

    match cli.command {
        Commands::List { name, sort, desc } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let filter = ListFilter {
                name_contains: name,
            };
            let apis = service
                .list_apis(&filter, ListOrder::new(sort, direction))
                .await?;
            print_json(&apis)?;
        }
        Commands::Get { id } => match service.get_api(&id).await? {
            Some(api) => print_json(&api)?,
            None => not_found(&format!("API not found: {}", id)),
        },
        Commands::Create {
            name,
            team,
            spec,
            description,
            docs_file,
        } => {
            let docs = match docs_file {
                Some(path) => read_docs(&path)?,
                None => Vec::new(),
            };
            let api = service
                .create_api(NewApi {
                    name,
                    team,
                    spec_location: spec,
                    description,
                    docs,
                })
                .await?;
            print_json(&api)?;
        }
        Commands::Update {
            id,
            name,
            team,
            spec,
            description,
            docs_file,
        } => {
            let docs = docs_file.as_deref().map(read_docs).transpose()?;
            let update = ApiUpdate {
                name,
                team,
                spec_location: spec,
                description,
                docs,
            };
            match service.update_api(&id, update).await? {
                Some(api) => print_json(&api)?,
                None => not_found(&format!("API not found: {}", id)),
            }
        }
        Commands::Delete { id } => {
            if service.delete_api(&id).await? {
                println!("deleted {}", id);
            } else {
                not_found(&format!("API not found: {}", id));
            }
        }
        Commands::Spec { id, raw: true } => {
            match service.get_raw_specification_location(&id).await? {
                Some(location) => println!("{}", location),
                None => not_found(&format!("API not found: {}", id)),
            }
        }
        Commands::Spec { id, raw: false } => match service.get_specification_content(&id).await {
            Some(content) => println!("{}", content),
            None => not_found(&format!("specification unavailable for API: {}", id)),
        },
        Commands::Summarize { id } => {
            println!("{}", service.summarize_specification(&id).await);
        }
        Commands::Doc { api_id, doc_id } => {
            match service.get_documentation(&api_id, &doc_id).await? {
                Some(page) => println!("{}", page.content),
                None => not_found(&format!("documentation not found: {}/{}", api_id, doc_id)),
            }
        }
        Commands::ValidateDoc { api_id, doc_id } => {
            if service.validate_documentation(&api_id, &doc_id).await {
                println!("ok");
            } else {
                println!("unreachable");
                std::process::exit(1);
            }
        }
        Commands::DocId { name } => {
            println!("{}", service.generate_documentation_id(&name)?);
        }
        Commands::Serve => {
            serve(Arc::new(service), &config.server.bind).await?;
        }
    }

    Ok(())
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                load_config(default)
            } else {
                parse_config("")
            }
        }
    }
}

fn read_docs(path: &Path) -> Result<Vec<DocumentationReference>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read docs file: {}", path.display()))?;
    let docs: Vec<DocumentationReference> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse docs file: {}", path.display()))?;
    if docs.iter().any(|d| d.url.trim().is_empty()) {
        bail!("Every documentation reference needs a url");
    }
    Ok(docs)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
