//! Persisted client cache parsing.
//!
//! The cache persistence layer stores the whole normalized client cache as one
//! JSON string under a single local-store key. Entries are keyed by cache id,
//! e.g. `CustomerToken:{}`.
//!
//! Error messages here never include cache contents: a malformed entry may
//! still hold credential material.

use serde::Deserialize;
use serde_json::{Map, Value};
use storefront_types::TokenRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheParseError {
    #[error("persisted cache is not valid JSON")]
    Json(#[source] serde_json::Error),
    #[error("persisted cache is not a JSON object")]
    NotAnObject,
    #[error("cache entry {0:?} is missing")]
    MissingEntry(String),
    #[error("cache entry {entry:?} does not match the token record shape")]
    MalformedEntry {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decoded top-level cache object.
#[derive(Debug, Clone, Default)]
pub struct PersistedCache(Map<String, Value>);

impl PersistedCache {
    pub fn parse(raw: &str) -> Result<Self, CacheParseError> {
        match serde_json::from_str::<Value>(raw).map_err(CacheParseError::Json)? {
            Value::Object(entries) => Ok(Self(entries)),
            _ => Err(CacheParseError::NotAnObject),
        }
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn token_record(&self, entry: &str) -> Result<TokenRecord, CacheParseError> {
        let value = self
            .entry(entry)
            .ok_or_else(|| CacheParseError::MissingEntry(entry.to_string()))?;
        TokenRecord::deserialize(value).map_err(|source| CacheParseError::MalformedEntry {
            entry: entry.to_string(),
            source,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = "CustomerToken:{}";

    #[test]
    fn parses_token_record() {
        let cache = PersistedCache::parse(
            r#"{"ROOT_QUERY":{"__typename":"Query"},"CustomerToken:{}":{"__typename":"CustomerToken","token":"tok-789","valid":true}}"#,
        )
        .unwrap();

        assert_eq!(cache.len(), 2);
        let record = cache.token_record(ENTRY).unwrap();
        assert_eq!(record.customer_token().unwrap().as_str(), "tok-789");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            PersistedCache::parse("not-json"),
            Err(CacheParseError::Json(_))
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            PersistedCache::parse(r#"["CustomerToken:{}"]"#),
            Err(CacheParseError::NotAnObject)
        ));
    }

    #[test]
    fn missing_and_null_entries_are_missing() {
        let cache = PersistedCache::parse(r#"{"CustomerToken:{}":null}"#).unwrap();
        assert!(matches!(
            cache.token_record(ENTRY),
            Err(CacheParseError::MissingEntry(_))
        ));

        let empty = PersistedCache::parse("{}").unwrap();
        assert!(empty.is_empty());
        assert!(matches!(
            empty.token_record(ENTRY),
            Err(CacheParseError::MissingEntry(_))
        ));
    }

    #[test]
    fn malformed_entry_error_hides_contents() {
        let cache = PersistedCache::parse(r#"{"CustomerToken:{}":"raw-secret"}"#).unwrap();
        let err = cache.token_record(ENTRY).unwrap_err();

        assert!(matches!(err, CacheParseError::MalformedEntry { .. }));
        assert!(!err.to_string().contains("raw-secret"));
    }
}
