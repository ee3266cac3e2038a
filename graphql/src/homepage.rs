//! Data for the storefront home route.
//!
//! The store config is fetched first because it names the CMS home page.
//! The CMS page, navigation, CMS blocks and product list are then requested
//! concurrently. Missing pieces come back as `None`; GraphQL-level errors are
//! logged and do not fail the fetch.

use futures_util::future::{self, try_join4};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use storefront_config::HomePageConfig;
use storefront_link::{LinkError, LinkFuture};
use storefront_types::{GraphQLResponse, Operation};

use crate::client::StorefrontClient;

const DEFAULT_HOME_URL: &str = "home";

pub const STORE_CONFIG_QUERY: &str = "query StoreConfig { storeConfig { store_code locale \
     cms_home_page default_title base_currency_code } }";

pub const CMS_PAGE_QUERY: &str = "query CmsPage($url: String!) { route(url: $url) { \
     __typename ... on CmsPage { identifier url_key title content_heading content \
     meta_title meta_description meta_keywords } } }";

pub const LAYOUT_QUERY: &str = "query Layout { menu: categories { items { uid name url_path \
     include_in_menu children { uid name url_path include_in_menu } } } }";

pub const CMS_BLOCKS_QUERY: &str = "query GetCmsBlock($identifiers: [String]) { \
     cmsBlocks(identifiers: $identifiers) { items { identifier title content } } }";

pub const PRODUCT_LIST_QUERY: &str = "query ProductList($pageSize: Int = 24, \
     $currentPage: Int = 1, $filters: ProductAttributeFilterInput = {}) { \
     products(pageSize: $pageSize, currentPage: $currentPage, filter: $filters) { \
     total_count items { __typename uid sku name url_key small_image { url label } \
     price_range { minimum_price { final_price { value currency } } } } } }";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsBlock {
    pub identifier: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomePageData {
    pub store_config: Option<Value>,
    /// Present only when the home route resolves to a `CmsPage`.
    pub cms_page: Option<Value>,
    pub layout: Option<Value>,
    /// Requested blocks that exist, in the configured order.
    pub blocks: Vec<CmsBlock>,
    pub products: Option<Value>,
}

impl HomePageData {
    #[must_use]
    pub fn block(&self, identifier: &str) -> Option<&CmsBlock> {
        self.blocks.iter().find(|b| b.identifier == identifier)
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products
            .as_ref()
            .and_then(|p| p.get("items"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

pub async fn fetch_home_page(
    client: &StorefrontClient,
    settings: &HomePageConfig,
) -> Result<HomePageData, LinkError> {
    let conf = client
        .execute(Operation::new(STORE_CONFIG_QUERY).with_name("StoreConfig"))
        .await?;
    log_errors("StoreConfig", &conf);

    let store_config = conf.field("storeConfig").cloned();
    let url = home_url(store_config.as_ref());

    let page = client.execute(
        Operation::new(CMS_PAGE_QUERY)
            .with_name("CmsPage")
            .with_variables(json!({ "url": url })),
    );
    let layout = client.execute(Operation::new(LAYOUT_QUERY).with_name("Layout"));
    let blocks: LinkFuture = if settings.cms_blocks.is_empty() {
        Box::pin(future::ok::<_, LinkError>(GraphQLResponse::default()))
    } else {
        client.execute(
            Operation::new(CMS_BLOCKS_QUERY)
                .with_name("GetCmsBlock")
                .with_variables(json!({ "identifiers": settings.cms_blocks })),
        )
    };
    let products = client.execute(
        Operation::new(PRODUCT_LIST_QUERY)
            .with_name("ProductList")
            .with_variables(json!({
                "pageSize": settings.page_size,
                "currentPage": 1,
                "filters": { "category_url_path": { "eq": settings.product_category } }
            })),
    );

    let (page, layout, blocks, products) = try_join4(page, layout, blocks, products).await?;
    log_errors("CmsPage", &page);
    log_errors("Layout", &layout);
    log_errors("GetCmsBlock", &blocks);
    log_errors("ProductList", &products);

    let cms_page = page
        .field("route")
        .filter(|route| route.get("__typename").and_then(Value::as_str) == Some("CmsPage"))
        .cloned();

    let data = HomePageData {
        store_config,
        cms_page,
        layout: layout.data.filter(|data| !data.is_null()),
        blocks: pick_blocks(&blocks, &settings.cms_blocks),
        products: products.field("products").cloned(),
    };
    tracing::debug!(
        url = %url,
        cms_page = data.cms_page.is_some(),
        blocks = data.blocks.len(),
        products = data.product_count(),
        "Fetched home page data"
    );
    Ok(data)
}

/// CMS URL of the home page. Only a missing or null `cms_home_page` falls
/// back to `home`; an empty string is used as configured.
fn home_url(store_config: Option<&Value>) -> String {
    store_config
        .and_then(|c| c.get("cms_home_page"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_HOME_URL)
        .to_string()
}

fn pick_blocks(response: &GraphQLResponse, identifiers: &[String]) -> Vec<CmsBlock> {
    let items: Vec<CmsBlock> = response
        .field("cmsBlocks")
        .and_then(|blocks| blocks.get("items"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| CmsBlock::deserialize(item).ok())
                .collect()
        })
        .unwrap_or_default();

    identifiers
        .iter()
        .filter_map(|id| items.iter().find(|b| &b.identifier == id).cloned())
        .collect()
}

fn log_errors(operation: &str, response: &GraphQLResponse) {
    if response.has_errors() {
        tracing::warn!(
            operation,
            errors = %response.error_summary(),
            "GraphQL errors while fetching home page data"
        );
    }
}
