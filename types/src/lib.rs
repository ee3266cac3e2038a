//! Core domain types for the storefront GraphQL layer.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.
//!
//! - [`Operation`] - an outbound GraphQL request: name, document, variables, headers
//! - [`Headers`] - case-insensitive header mapping with redacted `Debug`
//! - [`CustomerToken`] / [`TokenRecord`] - the persisted customer credential
//! - [`GraphQLResponse`] - the decoded `{ data, errors }` envelope

#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod headers;
mod operation;
mod response;
mod token;

pub use headers::{AUTHORIZATION, Headers, InvalidHeaderName};
pub use operation::{Operation, RequestBody};
pub use response::{GraphQLError, GraphQLResponse};
pub use token::{
    CustomerToken, DEFAULT_CACHE_KEY, DEFAULT_TOKEN_ENTRY, EmptyTokenError, TokenRecord,
};
