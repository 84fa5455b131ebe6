//! The authentication endpoints consumed by the session store.
//!
//! The server is authoritative for identities and tokens. [`AuthApi`] is
//! the seam between the store and the transport; [`crate::HttpAuthApi`]
//! implements it over REST.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthApiError;
use crate::identity::Identity;

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account data for `POST /auth/register`.
///
/// Fields the client does not model (phone, address, ...) travel in
/// `extra` and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RegistrationRequest {
    /// Creates a registration payload with no extra fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Adds a pass-through field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Response of the login and registration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "user")]
    pub identity: Identity,
    pub token: String,
}

/// Response of `GET /auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(alias = "user")]
    pub identity: Identity,
}

/// Network operations the session store depends on.
///
/// Futures are not required to be `Send` so that browser transports can
/// implement the trait.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Exchanges credentials for an identity and token.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthApiError>;

    /// Creates an account and returns an identity and token for immediate use.
    async fn register(&self, request: &RegistrationRequest) -> Result<AuthResponse, AuthApiError>;

    /// Resolves a bearer token to the identity it belongs to.
    async fn verify(&self, token: &str) -> Result<Identity, AuthApiError>;

    /// Notifies the server that the token's session ended.
    async fn logout(&self, token: &str) -> Result<(), AuthApiError>;
}

/// Formats the `Authorization` header value for a bearer token.
#[must_use]
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}
