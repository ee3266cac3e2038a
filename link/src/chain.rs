//! Link chain plumbing.
//!
//! Links run synchronously: they inspect or mutate the operation, then call
//! [`Forward::run`] and return the downstream future unchanged (or wrapped).
//! All asynchronous work belongs to the terminating link.

use std::fmt;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};
use storefront_types::{GraphQLResponse, Operation};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Eventual result of an operation, produced by the terminating link.
pub type LinkFuture = BoxFuture<'static, Result<GraphQLResponse, LinkError>>;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link chain ended without a terminating link")]
    Unterminated,
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode GraphQL response: {0}")]
    Decode(#[source] BoxError),
}

impl LinkError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    pub fn decode(err: impl Into<BoxError>) -> Self {
        Self::Decode(err.into())
    }
}

/// A middleware unit in the request chain.
pub trait Link: Send + Sync {
    /// Short identifier used in logs and [`LinkChain::names`].
    fn name(&self) -> &str;

    /// Handle `operation`. Non-terminating links must call `forward.run`.
    fn request(&self, operation: Operation, forward: Forward<'_>) -> LinkFuture;
}

/// Continuation that hands an operation to the rest of the chain.
pub struct Forward<'a> {
    rest: &'a [Arc<dyn Link>],
}

impl<'a> Forward<'a> {
    pub(crate) fn new(rest: &'a [Arc<dyn Link>]) -> Self {
        Self { rest }
    }

    pub fn run(self, operation: Operation) -> LinkFuture {
        match self.rest.split_first() {
            Some((next, rest)) => next.request(operation, Forward { rest }),
            None => {
                tracing::warn!(
                    operation = operation.display_name(),
                    "Operation reached the end of the link chain without being sent"
                );
                Box::pin(future::ready(Err(LinkError::Unterminated)))
            }
        }
    }
}

/// An ordered, immutable list of links.
#[derive(Clone)]
pub struct LinkChain {
    links: Arc<[Arc<dyn Link>]>,
}

impl LinkChain {
    pub fn new(links: Vec<Arc<dyn Link>>) -> Self {
        Self {
            links: links.into(),
        }
    }

    pub fn execute(&self, operation: Operation) -> LinkFuture {
        Forward::new(&self.links).run(operation)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.links.iter().map(|link| link.name()).collect()
    }
}

impl fmt::Debug for LinkChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LinkChain").field(&self.names()).finish()
    }
}

/// A [`Link`] backed by a closure.
pub struct FnLink<F> {
    name: String,
    handler: F,
}

/// Adapt a closure into a [`Link`].
///
/// ```
/// use storefront_link::{Link, from_fn};
///
/// let link = from_fn("trace-id", |mut op, forward| {
///     op.headers_mut().insert("x-trace-id", "abc");
///     forward.run(op)
/// });
/// assert_eq!(link.name(), "trace-id");
/// ```
pub fn from_fn<F>(name: impl Into<String>, handler: F) -> FnLink<F>
where
    F: for<'a> Fn(Operation, Forward<'a>) -> LinkFuture + Send + Sync,
{
    FnLink {
        name: name.into(),
        handler,
    }
}

impl<F> Link for FnLink<F>
where
    F: for<'a> Fn(Operation, Forward<'a>) -> LinkFuture + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn request(&self, operation: Operation, forward: Forward<'_>) -> LinkFuture {
        (self.handler)(operation, forward)
    }
}
