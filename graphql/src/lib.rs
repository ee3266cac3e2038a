//! GraphQL transport and storefront data fetching.
//!
//! # Architecture
//!
//! - [`HttpLink`] - terminating link that POSTs operations to the Magento endpoint
//! - [`StoreHeaderLink`] - sets the Magento `store` header for the active locale
//! - [`StorefrontClient`] - assembles the chain from config, with the customer
//!   token link installed first
//! - [`homepage`] - store config, CMS page, navigation, CMS blocks, and products
//!   for the home route
//!
//! ```text
//! StorefrontClient::execute(op)
//!     -> customer-token -> magento-store -> http
//! ```

mod client;
pub mod homepage;
mod http;
mod store_header;

pub use client::StorefrontClient;
pub use homepage::{CmsBlock, HomePageData, fetch_home_page};
pub use http::{HttpLink, http_client};
pub use store_header::{STORE_HEADER, StoreHeaderLink};
