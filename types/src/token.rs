use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Top-level local-store key written by the client cache persistence layer.
pub const DEFAULT_CACHE_KEY: &str = "apollo-cache-persist";
/// Entry inside the persisted cache holding the customer token record.
pub const DEFAULT_TOKEN_ENTRY: &str = "CustomerToken:{}";

#[derive(Debug, Error)]
#[error("customer token must not be empty")]
pub struct EmptyTokenError;

/// A customer's bearer credential, guaranteed non-empty.
///
/// The value is used verbatim: no trimming, no escaping. `Debug` is manually
/// implemented so the token never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct CustomerToken(String);

impl CustomerToken {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyTokenError> {
        let value = value.into();
        if value.is_empty() {
            Err(EmptyTokenError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `authorization` header value: `"Bearer " + token`.
    #[must_use]
    pub fn bearer_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for CustomerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomerToken(<redacted>)")
    }
}

/// Persisted `CustomerToken` cache entry.
///
/// Only `token` is read. Other fields written by the login flow
/// (`createdAt`, `valid`, ...) are accepted and ignored.
#[derive(Clone, Default, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenRecord {
    /// The credential, if the record holds a non-empty token.
    #[must_use]
    pub fn customer_token(&self) -> Option<CustomerToken> {
        self.token
            .as_deref()
            .and_then(|token| CustomerToken::new(token).ok())
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("typename", &self.typename)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_value_is_verbatim() {
        let token = CustomerToken::new(" tok with spaces ✓ ").unwrap();
        assert_eq!(token.bearer_value(), "Bearer  tok with spaces ✓ ");
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(CustomerToken::new("").is_err());
    }

    #[test]
    fn debug_never_shows_token() {
        let token = CustomerToken::new("abc123").unwrap();
        assert_eq!(format!("{token:?}"), "CustomerToken(<redacted>)");

        let record: TokenRecord =
            serde_json::from_str(r#"{"__typename":"CustomerToken","token":"abc123"}"#).unwrap();
        let debug = format!("{record:?}");
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("CustomerToken"));
    }

    #[test]
    fn record_ignores_extra_fields() {
        let record: TokenRecord = serde_json::from_str(
            r#"{"token":"abc","createdAt":"2024-01-01T00:00:00Z","valid":true}"#,
        )
        .unwrap();
        assert_eq!(record.customer_token().unwrap().as_str(), "abc");
    }

    #[test]
    fn record_without_token_yields_none() {
        let record: TokenRecord = serde_json::from_str(r#"{"__typename":"CustomerToken"}"#).unwrap();
        assert!(record.customer_token().is_none());

        let empty: TokenRecord = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert!(empty.customer_token().is_none());
    }

    #[test]
    fn non_string_token_fails_to_deserialize() {
        assert!(serde_json::from_str::<TokenRecord>(r#"{"token":42}"#).is_err());
    }
}
