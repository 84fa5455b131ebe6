//! Configuration for the session store and its collaborators.

use serde::{Deserialize, Serialize};

/// Where the auth API lives, where session state is persisted, and which
/// views the route guard redirects to.
///
/// Every field has a default, so the whole section can be omitted when
/// loading from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Base URL of the clinic REST API. A relative path is resolved against
    /// the page origin in the browser.
    /// Default: "/api"
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    /// Storage key of the bearer token.
    /// Default: "token"
    #[serde(default = "default_token_key")]
    token_key: String,
    /// Storage key of the identity snapshot.
    /// Default: "user"
    #[serde(default = "default_identity_key")]
    identity_key: String,
    /// View unauthenticated visitors are sent to.
    /// Default: "/login"
    #[serde(default = "default_login_path")]
    login_path: String,
    /// View under-permissioned visitors are sent to.
    /// Default: "/unauthorized"
    #[serde(default = "default_unauthorized_path")]
    unauthorized_path: String,
}

fn default_api_base_url() -> String {
    "/api".to_string()
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_identity_key() -> String {
    "user".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_unauthorized_path() -> String {
    "/unauthorized".to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_key: default_token_key(),
            identity_key: default_identity_key(),
            login_path: default_login_path(),
            unauthorized_path: default_unauthorized_path(),
        }
    }
}

impl AccessConfig {
    /// Returns a copy pointing at a different API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the storage key of the bearer token.
    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Returns the storage key of the identity snapshot.
    #[must_use]
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    /// Returns the login view path.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Returns the unauthorized view path.
    #[must_use]
    pub fn unauthorized_path(&self) -> &str {
        &self.unauthorized_path
    }
}
