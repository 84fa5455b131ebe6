//! REST implementation of [`AuthApi`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::AUTHORIZATION};
use rootcause::prelude::Report;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::api::{
    AuthApi, AuthResponse, LoginRequest, RegistrationRequest, VerifyResponse, bearer_header,
};
use crate::config::AccessConfig;
use crate::error::AuthApiError;
use crate::identity::Identity;

/// Auth API client for the clinic backend.
///
/// Timeouts are left to the underlying transport.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Creates a client rooted at `base_url` (e.g. "https://clinic.example/api").
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the base URL is empty or the HTTP client
    /// cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Report<AuthApiError>> {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(AuthApiError::InvalidConfig {
                details: "api base URL is empty".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .build()
            .map_err(|e| AuthApiError::InvalidConfig {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Creates a client from the configured API base URL.
    ///
    /// # Errors
    ///
    /// See [`HttpAuthApi::new`].
    pub fn from_config(config: &AccessConfig) -> Result<Self, Report<AuthApiError>> {
        Self::new(config.api_base_url())
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, AuthApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| AuthApiError::Transport {
                details: e.to_string(),
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "auth endpoint responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AuthApiError> {
        self.execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AuthApiError::Decode {
                details: e.to_string(),
            })
    }
}

/// Classifies a non-success response, extracting the server's message from
/// a `{"message": ...}` or `{"error": ...}` body.
pub(crate) fn error_from_response(status: u16, body: &str) -> AuthApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .filter(|message| !message.trim().is_empty());

    match status {
        401 | 403 => AuthApiError::Unauthorized { message },
        _ => AuthApiError::Rejected { status, message },
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthApiError> {
        self.send(self.client.post(self.endpoint("/auth/login")).json(request))
            .await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegistrationRequest) -> Result<AuthResponse, AuthApiError> {
        self.send(self.client.post(self.endpoint("/auth/register")).json(request))
            .await
    }

    #[instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<Identity, AuthApiError> {
        let response: VerifyResponse = self
            .send(
                self.client
                    .get(self.endpoint("/auth/verify"))
                    .header(AUTHORIZATION, bearer_header(token)),
            )
            .await?;
        Ok(response.identity)
    }

    #[instrument(skip_all)]
    async fn logout(&self, token: &str) -> Result<(), AuthApiError> {
        // The body is ignored; some backends answer 204.
        self.execute(
            self.client
                .post(self.endpoint("/auth/logout"))
                .header(AUTHORIZATION, bearer_header(token)),
        )
        .await?;
        Ok(())
    }
}
