use std::sync::Arc;

use storefront_config::{StorefrontConfig, StorefrontLocale};
use storefront_link::{
    Link, LinkChain, LinkFuture, StoreAccessor, TokenCacheKeys, TokenInjectionLink,
    install_token_link,
};
use storefront_types::Operation;

use crate::http::{HttpLink, http_client};
use crate::store_header::StoreHeaderLink;

/// Entry point for sending operations through the storefront link chain.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    chain: LinkChain,
}

impl StorefrontClient {
    pub fn new(chain: LinkChain) -> Self {
        Self { chain }
    }

    /// Build `[customer-token, magento-store, http]` for `locale`.
    pub fn from_config(
        config: &StorefrontConfig,
        locale: &StorefrontLocale,
        accessor: StoreAccessor,
    ) -> Result<Self, reqwest::Error> {
        let http = http_client(config.http())?;
        let client_context = accessor.is_available();
        let host_links: Vec<Arc<dyn Link>> = vec![
            Arc::new(StoreHeaderLink::new(locale.magento_store_code())),
            Arc::new(HttpLink::new(http, config.magento_endpoint().clone())),
        ];

        let chain = LinkChain::new(install_token_link(
            &host_links,
            Self::token_link(config, accessor),
        ));
        tracing::debug!(
            chain = ?chain,
            locale = locale.locale(),
            client_context,
            endpoint = %config.magento_endpoint(),
            "Storefront client ready"
        );
        Ok(Self::new(chain))
    }

    /// The customer token link configured with the `[auth]` cache keys.
    pub fn token_link(config: &StorefrontConfig, accessor: StoreAccessor) -> TokenInjectionLink {
        let keys = TokenCacheKeys {
            cache_key: config.auth().cache_key.clone(),
            token_entry: config.auth().token_entry.clone(),
        };
        TokenInjectionLink::with_keys(accessor, keys)
    }

    /// Send `operation` through the chain.
    pub fn execute(&self, operation: Operation) -> LinkFuture {
        self.chain.execute(operation)
    }

    #[must_use]
    pub fn chain(&self) -> &LinkChain {
        &self.chain
    }
}
