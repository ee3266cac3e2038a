//! Shared test utilities and fixtures
//!
//! Common infrastructure for CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;
use storefront_cli::{Cli, run};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Persisted cache for a signed-in customer.
pub const SIGNED_IN_CACHE: &str = r#"{"CustomerToken:{}":{"token":"tok-789"}}"#;

/// Write a config pointing at `endpoint` with its local store at `store`.
pub fn write_config(dir: &Path, endpoint: &str, store: &Path) -> PathBuf {
    let config = format!(
        r#"
magento_endpoint = "{endpoint}/graphql"
magento_version = 247
canonical_base_url = "http://localhost:3000"

[[storefront]]
locale = "en"
magento_store_code = "default"
default_locale = true

[[storefront]]
locale = "sr"
magento_store_code = "sr_RS"

[auth]
store_path = "{}"

[homepage]
cms_blocks = []
"#,
        store.display()
    );
    let path = dir.join("config.toml");
    std::fs::write(&path, config).unwrap();
    path
}

/// Write a local-storage file holding `cache` under `apollo-cache-persist`.
pub fn write_store(path: &Path, cache: &str) {
    let store = serde_json::json!({ "apollo-cache-persist": cache });
    std::fs::write(path, serde_json::to_vec(&store).unwrap()).unwrap();
}

/// Mount a response for requests whose `operationName` is `name`.
pub async fn mount_operation(server: &MockServer, name: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(serde_json::json!({ "operationName": name })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Parse `args` (without the program name) and run the command, returning stdout.
pub async fn run_cli(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("storefront").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(cli, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}
