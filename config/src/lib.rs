//! Storefront configuration.
//!
//! Raw TOML deserialization structs (with `Option` fields and serde defaults)
//! stay private. They are resolved into validated types at the parse boundary
//! via `#[serde(try_from)]`, so holding a [`StorefrontConfig`] is proof that the
//! endpoints parse as URLs and the locale list has exactly one default.
//!
//! ```toml
//! magento_endpoint = "https://magento.test/graphql"
//! magento_version = 247
//! canonical_base_url = "http://localhost:3000"
//! product_filters_pro = true
//! product_filters_layout = "SIDEBAR"
//!
//! [[storefront]]
//! locale = "en"
//! magento_store_code = "default"
//! default_locale = true
//!
//! [auth]
//! cache_key = "apollo-cache-persist"
//! token_entry = "CustomerToken:{}"
//! store_path = "${HOME}/.storefront/local-storage.json"
//! ```

mod env;
mod locale;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use storefront_types::{DEFAULT_CACHE_KEY, DEFAULT_TOKEN_ENTRY};
use thiserror::Error;
use url::Url;

pub use env::expand_env_vars;
pub use locale::{LocaleError, Locales, StorefrontLocale};

use locale::RawLocale;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 14;
const DEFAULT_PRODUCT_CATEGORY: &str = "gear/bags";
const DEFAULT_CMS_BLOCKS: &[&str] = &["test_blok", "test_blok_dva"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid URL ({value:?}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Locale(#[from] LocaleError),
    #[error("auth.{0} must not be empty")]
    EmptyAuthKey(&'static str),
    #[error("http.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("homepage.page_size must be greater than zero")]
    ZeroPageSize,
}

/// Layout of the product filter UI, as named by the storefront framework.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductFiltersLayout {
    #[default]
    Default,
    Sidebar,
}

#[derive(Deserialize)]
struct RawConfig {
    magento_endpoint: String,
    magento_version: Option<u32>,
    canonical_base_url: String,
    #[serde(default)]
    product_filters_pro: bool,
    #[serde(default)]
    product_filters_layout: ProductFiltersLayout,
    #[serde(default)]
    storefront: Vec<RawLocale>,
    #[serde(default)]
    auth: RawAuthConfig,
    #[serde(default)]
    http: RawHttpConfig,
    #[serde(default)]
    homepage: RawHomePageConfig,
}

#[derive(Default, Deserialize)]
struct RawAuthConfig {
    cache_key: Option<String>,
    token_entry: Option<String>,
    store_path: Option<String>,
}

#[derive(Default, Deserialize)]
struct RawHttpConfig {
    timeout_seconds: Option<u64>,
    connect_timeout_seconds: Option<u64>,
}

#[derive(Default, Deserialize)]
struct RawHomePageConfig {
    cms_blocks: Option<Vec<String>>,
    product_category: Option<String>,
    page_size: Option<u32>,
}

/// Where the customer token lives in the persisted client cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub cache_key: String,
    pub token_entry: String,
    /// File backing the local store. `None` falls back to [`default_store_path`].
    pub store_path: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            token_entry: DEFAULT_TOKEN_ENTRY.to_string(),
            store_path: None,
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_path.clone().or_else(default_store_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Inputs for the homepage data fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePageConfig {
    pub cms_blocks: Vec<String>,
    pub product_category: String,
    pub page_size: u32,
}

impl Default for HomePageConfig {
    fn default() -> Self {
        Self {
            cms_blocks: DEFAULT_CMS_BLOCKS.iter().map(ToString::to_string).collect(),
            product_category: DEFAULT_PRODUCT_CATEGORY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct StorefrontConfig {
    magento_endpoint: Url,
    magento_version: Option<u32>,
    canonical_base_url: Url,
    product_filters_pro: bool,
    product_filters_layout: ProductFiltersLayout,
    locales: Locales,
    auth: AuthConfig,
    http: HttpConfig,
    homepage: HomePageConfig,
}

impl TryFrom<RawConfig> for StorefrontConfig {
    type Error = ValidationError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let magento_endpoint = parse_url("magento_endpoint", &raw.magento_endpoint)?;
        let canonical_base_url = parse_url("canonical_base_url", &raw.canonical_base_url)?;
        let locales = Locales::resolve(raw.storefront)?;

        let defaults = AuthConfig::default();
        let cache_key = non_empty(raw.auth.cache_key, "cache_key")?.unwrap_or(defaults.cache_key);
        let token_entry =
            non_empty(raw.auth.token_entry, "token_entry")?.unwrap_or(defaults.token_entry);
        let store_path = raw
            .auth
            .store_path
            .map(|p| expand_env_vars(&p))
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let mut http = HttpConfig::default();
        if let Some(secs) = raw.http.timeout_seconds {
            http.timeout = non_zero_secs(secs, "timeout_seconds")?;
        }
        if let Some(secs) = raw.http.connect_timeout_seconds {
            http.connect_timeout = non_zero_secs(secs, "connect_timeout_seconds")?;
        }

        let mut homepage = HomePageConfig::default();
        if let Some(blocks) = raw.homepage.cms_blocks {
            homepage.cms_blocks = blocks;
        }
        if let Some(category) = raw.homepage.product_category {
            homepage.product_category = category;
        }
        if let Some(size) = raw.homepage.page_size {
            if size == 0 {
                return Err(ValidationError::ZeroPageSize);
            }
            homepage.page_size = size;
        }

        Ok(Self {
            magento_endpoint,
            magento_version: raw.magento_version,
            canonical_base_url,
            product_filters_pro: raw.product_filters_pro,
            product_filters_layout: raw.product_filters_layout,
            locales,
            auth: AuthConfig {
                cache_key,
                token_entry,
                store_path,
            },
            http,
            homepage,
        })
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ValidationError> {
    let expanded = expand_env_vars(value);
    Url::parse(expanded.trim()).map_err(|source| ValidationError::InvalidUrl {
        field,
        value: expanded,
        source,
    })
}

fn non_zero_secs(secs: u64, field: &'static str) -> Result<Duration, ValidationError> {
    if secs == 0 {
        return Err(ValidationError::ZeroTimeout(field));
    }
    Ok(Duration::from_secs(secs))
}

fn non_empty(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if v.is_empty() => Err(ValidationError::EmptyAuthKey(field)),
        other => Ok(other),
    }
}

impl StorefrontConfig {
    /// Load from the default location (`$STOREFRONT_CONFIG` or
    /// `~/.storefront/config.toml`). Returns `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No storefront config file");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::from_toml_str(&content).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn magento_endpoint(&self) -> &Url {
        &self.magento_endpoint
    }

    #[must_use]
    pub fn magento_version(&self) -> Option<u32> {
        self.magento_version
    }

    #[must_use]
    pub fn canonical_base_url(&self) -> &Url {
        &self.canonical_base_url
    }

    #[must_use]
    pub fn product_filters_pro(&self) -> bool {
        self.product_filters_pro
    }

    #[must_use]
    pub fn product_filters_layout(&self) -> ProductFiltersLayout {
        self.product_filters_layout
    }

    #[must_use]
    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    #[must_use]
    pub fn default_locale(&self) -> &StorefrontLocale {
        self.locales.default_locale()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    #[must_use]
    pub fn http(&self) -> HttpConfig {
        self.http
    }

    #[must_use]
    pub fn homepage(&self) -> &HomePageConfig {
        &self.homepage
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    storefront_dir().map(|dir| dir.join("config.toml"))
}

/// Default file backing the persisted client cache.
pub fn default_store_path() -> Option<PathBuf> {
    storefront_dir().map(|dir| dir.join("local-storage.json"))
}

fn storefront_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".storefront"))
}
