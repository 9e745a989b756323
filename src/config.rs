use std::fmt;

use crate::{AirtableProvider, AirtableStore, Error, Result};

/// Configuration for an [`AirtableProvider`] talking to the Airtable API.
#[derive(Clone)]
pub struct ProviderConfig {
    pub(crate) api_key: String,
    pub(crate) base_id: String,
    pub(crate) table: String,
    pub(crate) base_url: String,
}

impl ProviderConfig {
    /// Default base URL for API calls.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.airtable.com/v0";

    /// Table that holds flag rows unless configured otherwise.
    pub const DEFAULT_TABLE: &'static str = "Flags";

    /// Environment variable holding the access token.
    pub const ACCESS_TOKEN_VAR: &'static str = "ACCESS_TOKEN";

    /// Environment variable holding the base id.
    pub const BASE_ID_VAR: &'static str = "BASE_ID";

    /// Create a configuration for the given access token and base.
    ///
    /// ```
    /// # use airtable_flags::ProviderConfig;
    /// ProviderConfig::new("access-token", "appXXXXXXXXXXXXXX");
    /// ```
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        ProviderConfig {
            api_key: api_key.into(),
            base_id: base_id.into(),
            table: ProviderConfig::DEFAULT_TABLE.to_owned(),
            base_url: ProviderConfig::DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Read the access token and base id from `ACCESS_TOKEN` and `BASE_ID`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingEnvVar`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        ProviderConfig::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingEnvVar(name))
        };

        Ok(ProviderConfig::new(
            require(ProviderConfig::ACCESS_TOKEN_VAR)?,
            require(ProviderConfig::BASE_ID_VAR)?,
        ))
    }

    /// Override the table flags are read from.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    /// Override base URL for API calls. Clients should use the default setting in most cases.
    pub fn base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a new, not yet initialized [`AirtableProvider`] using this configuration.
    ///
    /// ```
    /// # use airtable_flags::ProviderConfig;
    /// let provider = ProviderConfig::new("access-token", "appXXXXXXXXXXXXXX")
    ///     .table("Feature Flags")
    ///     .to_provider()
    ///     .unwrap();
    /// assert!(!provider.is_ready());
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBaseUrl`] if the base URL cannot be parsed.
    pub fn to_provider(&self) -> Result<AirtableProvider<AirtableStore>> {
        let store = AirtableStore::new(&self.base_url, &self.api_key, &self.base_id)?;
        Ok(AirtableProvider::new(store, &self.table))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("table", &self.table)
            .field("base_url", &self.base_url)
            .finish()
    }
}
