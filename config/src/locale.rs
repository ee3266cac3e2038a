use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("at least one [[storefront]] locale is required")]
    NoLocales,
    #[error("locale must not be empty")]
    EmptyLocale,
    #[error("locale {0:?} has an empty magento_store_code")]
    EmptyStoreCode(String),
    #[error("locale {0:?} is declared more than once")]
    DuplicateLocale(String),
    #[error("exactly one locale must set default_locale = true (none did)")]
    NoDefaultLocale,
    #[error("exactly one locale must set default_locale = true (found: {})", .0.join(", "))]
    MultipleDefaultLocales(Vec<String>),
}

#[derive(Deserialize)]
pub(crate) struct RawLocale {
    locale: String,
    magento_store_code: String,
    #[serde(default)]
    default_locale: bool,
}

/// One storefront entry: a locale served from a Magento store view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontLocale {
    locale: String,
    magento_store_code: String,
    default_locale: bool,
}

impl StorefrontLocale {
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Value for the Magento `Store` header.
    #[must_use]
    pub fn magento_store_code(&self) -> &str {
        &self.magento_store_code
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.default_locale
    }
}

/// Validated locale list. Invariant: non-empty, unique locales, exactly one default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales(Vec<StorefrontLocale>);

impl Locales {
    pub(crate) fn resolve(raw: Vec<RawLocale>) -> Result<Self, LocaleError> {
        if raw.is_empty() {
            return Err(LocaleError::NoLocales);
        }

        let mut locales: Vec<StorefrontLocale> = Vec::with_capacity(raw.len());
        for entry in raw {
            let locale = entry.locale.trim().to_string();
            if locale.is_empty() {
                return Err(LocaleError::EmptyLocale);
            }
            if entry.magento_store_code.trim().is_empty() {
                return Err(LocaleError::EmptyStoreCode(locale));
            }
            if locales.iter().any(|l| l.locale == locale) {
                return Err(LocaleError::DuplicateLocale(locale));
            }
            locales.push(StorefrontLocale {
                locale,
                magento_store_code: entry.magento_store_code.trim().to_string(),
                default_locale: entry.default_locale,
            });
        }

        let defaults: Vec<String> = locales
            .iter()
            .filter(|l| l.default_locale)
            .map(|l| l.locale.clone())
            .collect();
        match defaults.len() {
            0 => Err(LocaleError::NoDefaultLocale),
            1 => Ok(Self(locales)),
            _ => Err(LocaleError::MultipleDefaultLocales(defaults)),
        }
    }

    #[must_use]
    pub fn default_locale(&self) -> &StorefrontLocale {
        // Non-empty with exactly one default, enforced by `resolve`.
        self.0
            .iter()
            .find(|l| l.default_locale)
            .unwrap_or(&self.0[0])
    }

    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&StorefrontLocale> {
        self.0.iter().find(|l| l.locale == locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StorefrontLocale> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(locale: &str, code: &str, default_locale: bool) -> RawLocale {
        RawLocale {
            locale: locale.to_string(),
            magento_store_code: code.to_string(),
            default_locale,
        }
    }

    #[test]
    fn single_default_resolves() {
        let locales =
            Locales::resolve(vec![raw("en", "default", true), raw("nl", "nl_NL", false)]).unwrap();
        assert_eq!(locales.default_locale().locale(), "en");
        assert_eq!(locales.get("nl").unwrap().magento_store_code(), "nl_NL");
        assert_eq!(locales.iter().count(), 2);
    }

    #[test]
    fn empty_list_rejected() {
        assert_eq!(Locales::resolve(vec![]), Err(LocaleError::NoLocales));
    }

    #[test]
    fn missing_default_rejected() {
        assert_eq!(
            Locales::resolve(vec![raw("en", "default", false)]),
            Err(LocaleError::NoDefaultLocale)
        );
    }

    #[test]
    fn multiple_defaults_rejected() {
        assert_eq!(
            Locales::resolve(vec![raw("en", "default", true), raw("nl", "nl_NL", true)]),
            Err(LocaleError::MultipleDefaultLocales(vec![
                "en".to_string(),
                "nl".to_string()
            ]))
        );
    }

    #[test]
    fn duplicate_and_blank_entries_rejected() {
        assert_eq!(
            Locales::resolve(vec![raw("en", "default", true), raw("en", "other", false)]),
            Err(LocaleError::DuplicateLocale("en".to_string()))
        );
        assert_eq!(
            Locales::resolve(vec![raw("en", "  ", true)]),
            Err(LocaleError::EmptyStoreCode("en".to_string()))
        );
        assert_eq!(
            Locales::resolve(vec![raw(" ", "default", true)]),
            Err(LocaleError::EmptyLocale)
        );
    }
}
