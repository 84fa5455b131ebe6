//! Session store wiring for the component tree.
//!
//! The app owns one [`SessionStore`] and hands it to components through
//! [`AuthContext`]. Store updates are mirrored into a reactive signal so
//! guards and views re-render when the session changes.

use std::sync::Arc;

use leptos::prelude::*;
use vetdesk_access::{
    AccessConfig, AuthApiError, AuthOutcome, HttpAuthApi, RegistrationRequest, Session,
    SessionStore,
};

/// Persisted session state lives in `localStorage` in the browser and in
/// memory while rendering on the server.
#[cfg(feature = "hydrate")]
pub type AppStorage = vetdesk_access::BrowserStorage;
#[cfg(not(feature = "hydrate"))]
pub type AppStorage = vetdesk_access::MemoryStorage;

/// The session store used by the app.
pub type AppStore = SessionStore<HttpAuthApi, AppStorage>;

/// Id of the element the server embeds the access configuration in.
pub const CONFIG_ELEMENT_ID: &str = "vetdesk-access-config";

/// Handle to the session, shared through the Leptos context.
#[derive(Clone)]
pub struct AuthContext {
    session: RwSignal<Session>,
    store: Arc<AppStore>,
    config: Arc<AccessConfig>,
}

impl AuthContext {
    /// Builds the store for `config`.
    ///
    /// In the browser this also starts session restoration and the bridge
    /// from store updates to the session signal. On the server the session
    /// stays in its restoring state, so protected views render their
    /// placeholder until the browser takes over.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the API client cannot be built.
    pub fn new(config: AccessConfig) -> vetdesk_core::Result<Self, AuthApiError> {
        let api = HttpAuthApi::new(resolve_api_base_url(
            config.api_base_url(),
            page_origin().as_deref(),
        ))?;

        #[cfg(feature = "hydrate")]
        let storage = AppStorage::new(&config);
        #[cfg(not(feature = "hydrate"))]
        let storage = AppStorage::new();

        let store = Arc::new(SessionStore::new(api, storage));
        let context = Self {
            session: RwSignal::new(store.session()),
            store,
            config: Arc::new(config),
        };

        #[cfg(feature = "hydrate")]
        context.start();

        Ok(context)
    }

    #[cfg(feature = "hydrate")]
    fn start(&self) {
        use leptos::task::spawn_local;

        let mut updates = self.store.subscribe();
        let session = self.session;
        spawn_local(async move {
            while updates.changed().await.is_ok() {
                let next = updates.borrow_and_update().clone();
                if session.try_set(next).is_some() {
                    // Signal disposed; the app is gone.
                    break;
                }
            }
        });

        let store = Arc::clone(&self.store);
        spawn_local(async move { store.restore().await });
    }

    /// Returns the reactive session.
    #[must_use]
    pub fn session(&self) -> ReadSignal<Session> {
        self.session.read_only()
    }

    /// Returns the access configuration the app was started with.
    #[must_use]
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Logs in and returns the outcome for the form to branch on.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let outcome = self.store.login(email, password).await;
        self.sync();
        outcome
    }

    /// Registers an account and logs it in.
    pub async fn register(&self, request: RegistrationRequest) -> AuthOutcome {
        let outcome = self.store.register(request).await;
        self.sync();
        outcome
    }

    /// Logs out locally, then notifies the server.
    pub async fn logout(&self) {
        self.store.logout().await;
        self.sync();
    }

    // The bridge task may not have run yet when an operation returns;
    // callers navigate right after, so publish the final state now.
    fn sync(&self) {
        self.session.set(self.store.session());
    }
}

/// Provides an [`AuthContext`] to the component tree.
///
/// # Errors
///
/// See [`AuthContext::new`].
pub fn provide_auth(config: AccessConfig) -> vetdesk_core::Result<AuthContext, AuthApiError> {
    let auth = AuthContext::new(config)?;
    provide_context(auth.clone());
    Ok(auth)
}

/// Returns the [`AuthContext`] provided by the app.
#[must_use]
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Joins a root-relative API base URL onto the page origin.
///
/// Absolute URLs, and any URL when no origin is known, are returned as is.
#[must_use]
pub fn resolve_api_base_url(configured: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) if configured.starts_with('/') && !configured.starts_with("//") => {
            format!("{}{configured}", origin.trim_end_matches('/'))
        }
        _ => configured.to_string(),
    }
}

#[cfg(feature = "hydrate")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(feature = "hydrate"))]
fn page_origin() -> Option<String> {
    None
}

/// Serializes `config` for embedding in the page shell.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn embed_config(config: &AccessConfig) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(config)?.replace("</", "<\\/"))
}

/// Reads the access configuration the server embedded in the page.
#[cfg(feature = "hydrate")]
#[must_use]
pub fn embedded_config() -> Option<AccessConfig> {
    let text = web_sys::window()?
        .document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)?
        .text_content()?;

    match serde_json::from_str(&text) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(error = %err, "embedded access configuration is invalid");
            None
        }
    }
}
