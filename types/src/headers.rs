use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "authorization";

/// Header values that never appear in `Debug` output.
const SENSITIVE_HEADERS: &[&str] = &[AUTHORIZATION, "cookie", "proxy-authorization"];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid header name: {0:?}")]
pub struct InvalidHeaderName(pub String);

/// Transport headers attached to an [`Operation`](crate::Operation).
///
/// Names are case-insensitive and stored lowercase, so inserting `Authorization`
/// and then `authorization` leaves a single entry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a header, returning the previous value.
    ///
    /// Invalid names are dropped; use [`Headers::try_insert`] to observe them.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.try_insert(name, value).ok().flatten()
    }

    pub fn try_insert(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, InvalidHeaderName> {
        let name = normalize_name(name)?;
        Ok(self.0.insert(name, value.into()))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
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

fn normalize_name(name: &str) -> Result<String, InvalidHeaderName> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if valid {
        Ok(name.to_ascii_lowercase())
    } else {
        Err(InvalidHeaderName(name.to_string()))
    }
}

// Manual Debug impl to prevent leaking credentials in logs.
impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.0 {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                map.entry(name, &"<redacted>");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}
