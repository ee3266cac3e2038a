//! Customer token injection.
//!
//! [`TokenInjectionLink`] reads the customer token from the persisted client
//! cache and sets `authorization: Bearer <token>` on every outbound operation.
//! It is evaluated independently per operation and holds no state between
//! invocations.
//!
//! | Outcome | Headers |
//! |---------|---------|
//! | `Found` | `authorization` set to `"Bearer " + token` |
//! | `NoClientContext` | unchanged, store never touched |
//! | `StoreMiss` | unchanged |
//! | `MalformedRecord` | unchanged |
//! | `Unexpected` | unchanged |
//!
//! The operation is always forwarded. A missing credential surfaces later as
//! the backend's ordinary unauthenticated response.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use storefront_types::{
    AUTHORIZATION, CustomerToken, DEFAULT_CACHE_KEY, DEFAULT_TOKEN_ENTRY, Operation,
};
use tracing::{debug, warn};

use crate::cache::{CacheParseError, PersistedCache};
use crate::chain::{Forward, Link, LinkFuture};
use crate::store::{LocalStore, StoreAccessor};

/// Location of the token record inside the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCacheKeys {
    /// Top-level local-store key holding the serialized cache.
    pub cache_key: String,
    /// Entry inside the cache holding `{ token: string }`.
    pub token_entry: String,
}

impl Default for TokenCacheKeys {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            token_entry: DEFAULT_TOKEN_ENTRY.to_string(),
        }
    }
}

/// Result of a single token lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLookup {
    Found(CustomerToken),
    /// No local store in this execution context (server-side).
    NoClientContext,
    /// Store empty, or the cache key / token entry absent.
    StoreMiss,
    /// Data present but unparseable, or the record has no usable token.
    MalformedRecord,
    /// Store access failed or the store implementation panicked.
    Unexpected,
}

impl TokenLookup {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NoClientContext => "no-client-context",
            Self::StoreMiss => "store-miss",
            Self::MalformedRecord => "malformed-record",
            Self::Unexpected => "unexpected",
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&CustomerToken> {
        match self {
            Self::Found(token) => Some(token),
            _ => None,
        }
    }
}

/// Link that attaches the persisted customer token as a bearer credential.
#[derive(Debug, Clone)]
pub struct TokenInjectionLink {
    accessor: StoreAccessor,
    keys: TokenCacheKeys,
}

impl TokenInjectionLink {
    pub const NAME: &'static str = "customer-token";

    pub fn new(accessor: StoreAccessor) -> Self {
        Self::with_keys(accessor, TokenCacheKeys::default())
    }

    pub fn with_keys(accessor: StoreAccessor, keys: TokenCacheKeys) -> Self {
        Self { accessor, keys }
    }

    #[must_use]
    pub fn keys(&self) -> &TokenCacheKeys {
        &self.keys
    }

    /// Look up the current token without touching any operation.
    #[must_use]
    pub fn lookup(&self) -> TokenLookup {
        let Some(store) = self.accessor.store() else {
            return TokenLookup::NoClientContext;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| read_token(store, &self.keys))) {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Local store panicked during customer token lookup");
                TokenLookup::Unexpected
            }
        }
    }

    /// Look up the token and, if found, set the `authorization` header.
    ///
    /// Other headers are preserved; an existing `authorization` value is
    /// overwritten, so repeated application is idempotent.
    pub fn apply(&self, operation: &mut Operation) -> TokenLookup {
        let outcome = self.lookup();
        if let TokenLookup::Found(token) = &outcome {
            operation
                .headers_mut()
                .insert(AUTHORIZATION, token.bearer_value());
        }
        debug!(
            operation = operation.display_name(),
            outcome = outcome.as_str(),
            "Customer token lookup"
        );
        outcome
    }
}

fn read_token(store: &dyn LocalStore, keys: &TokenCacheKeys) -> TokenLookup {
    let raw = match store.get_item(&keys.cache_key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => return TokenLookup::StoreMiss,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted client cache");
            return TokenLookup::Unexpected;
        }
    };

    let record = PersistedCache::parse(&raw).and_then(|cache| cache.token_record(&keys.token_entry));
    match record {
        Ok(record) => record
            .customer_token()
            .map_or(TokenLookup::MalformedRecord, TokenLookup::Found),
        Err(CacheParseError::MissingEntry(_)) => TokenLookup::StoreMiss,
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable customer token record");
            TokenLookup::MalformedRecord
        }
    }
}

impl Link for TokenInjectionLink {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn request(&self, mut operation: Operation, forward: Forward<'_>) -> LinkFuture {
        self.apply(&mut operation);
        forward.run(operation)
    }
}

/// Return a new link list with `link` first, followed by `existing`.
///
/// The caller's list is not modified. Links supplied by the host run after
/// token injection and observe the completed header set.
#[must_use]
pub fn install_token_link(
    existing: &[Arc<dyn Link>],
    link: TokenInjectionLink,
) -> Vec<Arc<dyn Link>> {
    let mut links: Vec<Arc<dyn Link>> = Vec::with_capacity(existing.len() + 1);
    links.push(Arc::new(link));
    links.extend(existing.iter().cloned());
    links
}
