//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (e.g. `ACCESS__API_BASE_URL`).

use serde::Deserialize;
use vetdesk_access::AccessConfig;

/// Server configuration composed from library configs.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Session store and route guard configuration, embedded in every page
    /// for the browser.
    #[serde(default)]
    pub access: AccessConfig,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured value is invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(
            config::Config::builder().add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            ),
        )
    }

    fn load(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}
