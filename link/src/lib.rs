//! GraphQL request link chain with customer token injection.
//!
//! # Architecture
//!
//! Every outbound [`Operation`] passes through an ordered list of [`Link`]s.
//! Each link may mutate the operation's headers and then hands it to the
//! [`Forward`] continuation, which invokes the next link. The last link
//! performs the network transmission (see `storefront-graphql`).
//!
//! ```text
//! LinkChain::execute(op)
//!     -> TokenInjectionLink   (adds `authorization: Bearer <token>` when found)
//!     -> host links           (observe the completed header set)
//!     -> terminating link     (HTTP POST)
//! ```
//!
//! - [`chain`] - the [`Link`] trait, [`Forward`], [`LinkChain`], [`from_fn`]
//! - [`store`] - [`LocalStore`] implementations and the injected [`StoreAccessor`]
//! - [`cache`] - parsing of the persisted client cache blob
//! - [`auth`] - [`TokenInjectionLink`] and [`install_token_link`]
//!
//! # Error Handling
//!
//! Token lookup never fails an operation. Every store or parse failure is
//! classified as a [`TokenLookup`] outcome, logged without token material, and
//! the operation is forwarded unauthenticated. Only the terminating link
//! produces [`LinkError`]s.

pub mod auth;
pub mod cache;
pub mod chain;
pub mod store;

pub use auth::{TokenCacheKeys, TokenInjectionLink, TokenLookup, install_token_link};
pub use cache::{CacheParseError, PersistedCache};
pub use chain::{BoxError, FnLink, Forward, Link, LinkChain, LinkError, LinkFuture, from_fn};
pub use store::{FileStore, LocalStore, MemoryStore, StoreAccessor, StoreError};

pub use storefront_types::{GraphQLResponse, Headers, Operation};
