//! Command-line front end for the storefront link chain.
//!
//! ```text
//! storefront [--config <path>] [--locale <code>] [--ssr] <command>
//!
//!   token                                   report the customer token lookup outcome
//!   query <file.graphql> [--variables <json>] [--operation-name <name>]
//!                                           run a document and print the response
//!   home                                    fetch home page data and print it
//! ```
//!
//! `--ssr` runs without the persisted local store, the way a server-side
//! render would: no customer token is ever attached.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use storefront_config::{StorefrontConfig, StorefrontLocale, config_path};
use storefront_graphql::{StorefrontClient, fetch_home_page};
use storefront_link::{FileStore, StoreAccessor};
use storefront_types::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "storefront")]
#[command(about = "Send GraphQL operations through the storefront link chain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Config file (default: ~/.storefront/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Storefront locale (default: the default locale)
    #[arg(long, global = true)]
    pub locale: Option<String>,
    /// Run without the persisted local store
    #[arg(long, global = true)]
    pub ssr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Report the customer token lookup outcome
    Token,
    /// Run a GraphQL document and print the response
    Query {
        /// File holding the GraphQL document
        document: PathBuf,
        /// Variables object for the document, as JSON
        #[arg(long)]
        variables: Option<String>,
        /// Operation to run when the document has several
        #[arg(long)]
        operation_name: Option<String>,
    },
    /// Fetch home page data and print it as JSON
    Home,
}

/// Run `cli`, writing command output to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let locale = select_locale(&config, cli.locale.as_deref())?;
    let accessor = store_accessor(&config, cli.ssr);

    match cli.command {
        Command::Token => {
            let outcome = StorefrontClient::token_link(&config, accessor).lookup();
            writeln!(out, "{}", outcome.as_str())?;
        }
        Command::Query {
            document,
            variables,
            operation_name,
        } => {
            let operation = read_operation(&document, variables.as_deref(), operation_name)?;
            let client = StorefrontClient::from_config(&config, locale, accessor)
                .context("Failed to build HTTP client")?;
            let response = client
                .execute(operation)
                .await
                .with_context(|| format!("Query {} failed", document.display()))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
        }
        Command::Home => {
            let client = StorefrontClient::from_config(&config, locale, accessor)
                .context("Failed to build HTTP client")?;
            let data = fetch_home_page(&client, config.homepage())
                .await
                .context("Failed to fetch home page data")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&data)?)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<StorefrontConfig> {
    if let Some(path) = path {
        return StorefrontConfig::load_from(path).map_err(Into::into);
    }
    StorefrontConfig::load()?.ok_or_else(|| match config_path() {
        Some(path) => anyhow!("No config file at {}", path.display()),
        None => anyhow!("No config file: home directory is unknown and STOREFRONT_CONFIG is unset"),
    })
}

fn select_locale<'a>(
    config: &'a StorefrontConfig,
    locale: Option<&str>,
) -> Result<&'a StorefrontLocale> {
    match locale {
        Some(code) => config
            .locales()
            .get(code)
            .ok_or_else(|| anyhow!("Locale '{code}' is not configured")),
        None => Ok(config.default_locale()),
    }
}

fn store_accessor(config: &StorefrontConfig, ssr: bool) -> StoreAccessor {
    if ssr {
        return StoreAccessor::Unavailable;
    }
    match config.auth().store_path() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using file-backed local store");
            StoreAccessor::available(FileStore::new(path))
        }
        None => {
            tracing::warn!("No local store path; running without a customer token");
            StoreAccessor::Unavailable
        }
    }
}

fn read_operation(
    document: &Path,
    variables: Option<&str>,
    operation_name: Option<String>,
) -> Result<Operation> {
    let query = fs::read_to_string(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;
    let mut operation = Operation::new(query);

    if let Some(raw) = variables {
        let value: Value = serde_json::from_str(raw).context("--variables is not valid JSON")?;
        if !value.is_object() {
            bail!("--variables must be a JSON object");
        }
        operation = operation.with_variables(value);
    }
    if let Some(name) = operation_name {
        operation = operation.with_name(name);
    }
    Ok(operation)
}
