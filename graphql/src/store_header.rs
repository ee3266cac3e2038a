use storefront_link::{Forward, Link, LinkFuture};
use storefront_types::Operation;

/// Header Magento uses to select the store view.
pub const STORE_HEADER: &str = "store";

/// Sets the Magento `store` header unless the operation already carries one.
#[derive(Debug, Clone)]
pub struct StoreHeaderLink {
    store_code: String,
}

impl StoreHeaderLink {
    pub const NAME: &'static str = "magento-store";

    pub fn new(store_code: impl Into<String>) -> Self {
        Self {
            store_code: store_code.into(),
        }
    }
}

impl Link for StoreHeaderLink {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn request(&self, mut operation: Operation, forward: Forward<'_>) -> LinkFuture {
        if !operation.headers().contains(STORE_HEADER) {
            operation
                .headers_mut()
                .insert(STORE_HEADER, self.store_code.as_str());
        }
        forward.run(operation)
    }
}
