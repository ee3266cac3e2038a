//! End-to-end command tests against a mock Magento endpoint

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{SIGNED_IN_CACHE, mount_operation, run_cli, write_config, write_store};

struct Fixture {
    dir: TempDir,
    config: String,
}

impl Fixture {
    fn new(endpoint: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("local-storage.json");
        let config = write_config(dir.path(), endpoint, &store)
            .to_string_lossy()
            .into_owned();
        Self { dir, config }
    }

    fn store_path(&self) -> std::path::PathBuf {
        self.dir.path().join("local-storage.json")
    }
}

#[tokio::test]
async fn token_reports_outcomes_without_the_token() {
    let fixture = Fixture::new("http://127.0.0.1:1");
    let config = fixture.config.as_str();

    assert_eq!(run_cli(&["--config", config, "token"]).await.unwrap(), "store-miss\n");

    write_store(&fixture.store_path(), SIGNED_IN_CACHE);
    let out = run_cli(&["--config", config, "token"]).await.unwrap();
    assert_eq!(out, "found\n");
    assert!(!out.contains("tok-789"));

    assert_eq!(
        run_cli(&["--config", config, "token", "--ssr"]).await.unwrap(),
        "no-client-context\n"
    );

    write_store(&fixture.store_path(), "not-json");
    assert_eq!(
        run_cli(&["--config", config, "token"]).await.unwrap(),
        "malformed-record\n"
    );

    std::fs::write(fixture.store_path(), "[1, 2").unwrap();
    assert_eq!(
        run_cli(&["--config", config, "token"]).await.unwrap(),
        "unexpected\n"
    );
}

#[tokio::test]
async fn query_sends_token_and_prints_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer tok-789"))
        .and(header("store", "sr_RS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customer": { "firstname": "Jana" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    write_store(&fixture.store_path(), SIGNED_IN_CACHE);
    let document = fixture.dir.path().join("customer.graphql");
    std::fs::write(&document, "query Customer { customer { firstname } }").unwrap();

    let out = run_cli(&[
        "--config",
        &fixture.config,
        "--locale",
        "sr",
        "query",
        document.to_str().unwrap(),
        "--operation-name",
        "Customer",
    ])
    .await
    .unwrap();

    let printed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(printed["data"]["customer"]["firstname"], "Jana");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["operationName"], "Customer");
}

#[tokio::test]
async fn query_in_ssr_mode_is_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "x": 1 } })))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    write_store(&fixture.store_path(), SIGNED_IN_CACHE);
    let document = fixture.dir.path().join("q.graphql");
    std::fs::write(&document, "query Q($id: Int) { x(id: $id) }").unwrap();

    run_cli(&[
        "--ssr",
        "--config",
        &fixture.config,
        "query",
        document.to_str().unwrap(),
        "--variables",
        r#"{"id": 7}"#,
    ])
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["variables"], json!({ "id": 7 }));
}

#[tokio::test]
async fn query_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    let document = fixture.dir.path().join("q.graphql");
    std::fs::write(&document, "{ x }").unwrap();
    let doc = document.to_str().unwrap();

    let err = run_cli(&["--config", &fixture.config, "query", doc])
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("502"));

    let err = run_cli(&["--config", &fixture.config, "query", doc, "--variables", "[1]"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("JSON object"));

    let missing = fixture.dir.path().join("missing.graphql");
    assert!(
        run_cli(&["--config", &fixture.config, "query", missing.to_str().unwrap()])
            .await
            .is_err()
    );
}

#[tokio::test]
async fn home_prints_page_data() {
    let server = MockServer::start().await;
    mount_operation(
        &server,
        "StoreConfig",
        json!({ "data": { "storeConfig": { "cms_home_page": "home" } } }),
    )
    .await;
    mount_operation(
        &server,
        "CmsPage",
        json!({ "data": { "route": { "__typename": "CmsPage", "title": "Home page" } } }),
    )
    .await;
    mount_operation(&server, "Layout", json!({ "data": { "menu": { "items": [] } } })).await;
    mount_operation(
        &server,
        "ProductList",
        json!({ "data": { "products": { "total_count": 1, "items": [{ "sku": "24-MB01" }] } } }),
    )
    .await;

    let fixture = Fixture::new(&server.uri());
    let out = run_cli(&["--config", &fixture.config, "home", "--ssr"])
        .await
        .unwrap();

    let printed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(printed["cms_page"]["title"], "Home page");
    assert_eq!(printed["products"]["items"][0]["sku"], "24-MB01");
    assert_eq!(printed["blocks"], json!([]));

    // No GetCmsBlock request when no blocks are configured.
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_locale_and_missing_config_fail() {
    let fixture = Fixture::new("http://127.0.0.1:1");
    assert!(
        run_cli(&["--config", &fixture.config, "--locale", "de", "token"])
            .await
            .is_err()
    );

    let missing = fixture.dir.path().join("nope.toml");
    assert!(
        run_cli(&["--config", missing.to_str().unwrap(), "token"])
            .await
            .is_err()
    );
}
