//! The single source of truth for who is logged in.
//!
//! [`SessionStore`] owns the [`Session`] and is its only writer. Readers take
//! snapshots with [`SessionStore::session`] or follow changes through
//! [`SessionStore::subscribe`].
//!
//! Every identity-mutating operation takes a ticket from a monotonic
//! counter. A network response that arrives after a newer operation has
//! started is discarded instead of overwriting the newer state.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::api::{AuthApi, AuthResponse, LoginRequest, RegistrationRequest};
use crate::error::AuthApiError;
use crate::identity::{Identity, ProfilePatch};
use crate::session::{AuthOutcome, Session};
use crate::storage::SessionStorage;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Holds the current session and drives its lifecycle.
///
/// Construct one per application and hand it to whatever composes the
/// views; there is no global instance.
pub struct SessionStore<A, S> {
    api: A,
    storage: S,
    state: watch::Sender<Session>,
    generation: AtomicU64,
}

impl<A, S> SessionStore<A, S>
where
    A: AuthApi,
    S: SessionStorage,
{
    /// Creates a store in the restoring state. Call [`SessionStore::restore`]
    /// once at startup.
    #[must_use]
    pub fn new(api: A, storage: S) -> Self {
        let (state, _) = watch::channel(Session::restoring());
        Self {
            api,
            storage,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Returns the persisted bearer token for authenticated requests.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.token()
    }

    /// Returns the auth API the store talks to.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    fn cached_identity(&self) -> Option<Identity> {
        let snapshot = self.storage.identity_snapshot()?;
        match serde_json::from_str(&snapshot) {
            Ok(identity) => Some(identity),
            Err(err) => {
                debug!(error = %err, "ignoring unreadable identity snapshot");
                None
            }
        }
    }

    fn persist(&self, token: &str, identity: &Identity) {
        match serde_json::to_string(identity) {
            Ok(snapshot) => self.storage.save(token, &snapshot),
            Err(err) => warn!(error = %err, "failed to serialize identity snapshot"),
        }
    }

    fn persist_snapshot(&self, identity: &Identity) {
        match serde_json::to_string(identity) {
            Ok(snapshot) => self.storage.save_identity_snapshot(&snapshot),
            Err(err) => warn!(error = %err, "failed to serialize identity snapshot"),
        }
    }

    /// Restores the session persisted by a previous page load.
    ///
    /// A persisted token is always verified with the server; the cached
    /// snapshot is only shown while that round trip is in flight. Any
    /// failure ends in an empty session with persisted state cleared.
    #[instrument(skip(self))]
    pub async fn restore(&self) {
        let ticket = self.next_ticket();

        let Some(token) = self.storage.token() else {
            self.storage.clear();
            self.state.send_modify(Session::settle_anonymous);
            debug!("no persisted session");
            return;
        };

        let cached = self.cached_identity();
        self.state
            .send_modify(|session| session.begin_verifying(cached));

        let verified = self.api.verify(&token).await;
        if !self.is_current(ticket) {
            debug!("discarding superseded verify response");
            return;
        }

        match verified {
            Ok(identity) => {
                self.persist_snapshot(&identity);
                info!(user_id = %identity.id(), role = %identity.role(), "session restored");
                self.state
                    .send_modify(|session| session.settle_authenticated(identity));
            }
            Err(err) => {
                debug!(error = %err, "persisted session rejected");
                self.storage.clear();
                self.state.send_modify(Session::settle_anonymous);
            }
        }
    }

    /// Logs in with email and password.
    ///
    /// Failures are reported through the outcome and the session's last
    /// error, never as an error value.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate(self.api.login(&request), LOGIN_FAILED)
            .await
    }

    /// Registers an account and logs it in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegistrationRequest) -> AuthOutcome {
        self.authenticate(self.api.register(&request), REGISTRATION_FAILED)
            .await
    }

    async fn authenticate<F>(&self, call: F, fallback: &str) -> AuthOutcome
    where
        F: Future<Output = Result<AuthResponse, AuthApiError>>,
    {
        let ticket = self.next_ticket();
        let mut interrupted = false;
        self.state
            .send_modify(|session| interrupted = session.begin_loading());
        if interrupted {
            // The persisted session was never confirmed by the server.
            debug!("dropping unverified persisted session");
            self.storage.clear();
        }

        let result = call.await;
        if !self.is_current(ticket) {
            debug!("discarding superseded authentication response");
            return AuthOutcome::Superseded;
        }

        match result {
            Ok(AuthResponse { identity, token }) => {
                self.persist(&token, &identity);
                info!(user_id = %identity.id(), role = %identity.role(), "authenticated");
                let settled = identity.clone();
                self.state
                    .send_modify(|session| session.settle_authenticated(settled));
                AuthOutcome::Success(identity)
            }
            Err(err) => {
                info!(error = %err, "authentication failed");
                let message = err.server_message().unwrap_or(fallback).to_string();
                let stored = message.clone();
                self.state
                    .send_modify(|session| session.settle_failed(stored));
                AuthOutcome::Failure { message }
            }
        }
    }

    /// Ends the session.
    ///
    /// Local state is cleared before the server is notified, so logging out
    /// works with the backend unreachable. Any in-flight login, registration
    /// or restoration is superseded.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.next_ticket();
        let token = self.storage.token();

        self.storage.clear();
        self.state.send_modify(Session::settle_anonymous);
        info!("logged out");

        if let Some(token) = token
            && let Err(err) = self.api.logout(&token).await
        {
            warn!(error = %err, "logout notification failed");
        }
    }

    /// Merges profile changes already saved on the server into the current
    /// identity and re-persists the snapshot.
    ///
    /// Returns false if nobody is logged in.
    pub fn update_profile(&self, patch: ProfilePatch) -> bool {
        let mut updated = None;
        self.state.send_if_modified(|session| match session.identity_mut() {
            Some(identity) => {
                identity.apply(patch);
                updated = Some(identity.clone());
                true
            }
            None => false,
        });

        match updated {
            Some(identity) => {
                self.persist_snapshot(&identity);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{AccessRequirement, GuardDecision, RouteGuard};
    use crate::identity::PermissionSet;
    use crate::role::Role;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;
    use vetdesk_core::UserId;

    fn transport_error() -> AuthApiError {
        AuthApiError::Transport {
            details: "connection refused".to_string(),
        }
    }

    struct StubApi {
        login: Result<AuthResponse, AuthApiError>,
        register: Result<AuthResponse, AuthApiError>,
        verify: Result<Identity, AuthApiError>,
        logout: Result<(), AuthApiError>,
        login_gate: Option<Arc<Notify>>,
        register_gate: Option<Arc<Notify>>,
        verify_gate: Option<Arc<Notify>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubApi {
        fn new() -> Self {
            Self {
                login: Err(transport_error()),
                register: Err(transport_error()),
                verify: Err(transport_error()),
                logout: Ok(()),
                login_gate: None,
                register_gate: None,
                verify_gate: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_login(mut self, result: Result<AuthResponse, AuthApiError>) -> Self {
            self.login = result;
            self
        }

        fn with_register(mut self, result: Result<AuthResponse, AuthApiError>) -> Self {
            self.register = result;
            self
        }

        fn with_verify(mut self, result: Result<Identity, AuthApiError>) -> Self {
            self.verify = result;
            self
        }

        fn with_logout(mut self, result: Result<(), AuthApiError>) -> Self {
            self.logout = result;
            self
        }

        fn gate_login(mut self, gate: Arc<Notify>) -> Self {
            self.login_gate = Some(gate);
            self
        }

        fn gate_register(mut self, gate: Arc<Notify>) -> Self {
            self.register_gate = Some(gate);
            self
        }

        fn gate_verify(mut self, gate: Arc<Notify>) -> Self {
            self.verify_gate = Some(gate);
            self
        }

        fn record(&self, call: String) {
            self.calls.lock().expect("lock").push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait(?Send)]
    impl AuthApi for StubApi {
        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthApiError> {
            self.record(format!("login:{}", request.email));
            if let Some(gate) = &self.login_gate {
                gate.notified().await;
            }
            self.login.clone()
        }

        async fn register(
            &self,
            request: &RegistrationRequest,
        ) -> Result<AuthResponse, AuthApiError> {
            self.record(format!("register:{}", request.email));
            if let Some(gate) = &self.register_gate {
                gate.notified().await;
            }
            self.register.clone()
        }

        async fn verify(&self, token: &str) -> Result<Identity, AuthApiError> {
            self.record(format!("verify:{token}"));
            if let Some(gate) = &self.verify_gate {
                gate.notified().await;
            }
            self.verify.clone()
        }

        async fn logout(&self, token: &str) -> Result<(), AuthApiError> {
            self.record(format!("logout:{token}"));
            self.logout.clone()
        }
    }

    fn vet() -> Identity {
        Identity::new(UserId::from("v1"), "Dr. Ada", "ada@clinic.test", Role::Veterinarian)
            .with_permissions(["pets.view", "appointments.view"].into_iter().collect::<PermissionSet>())
    }

    fn granted(identity: Identity, token: &str) -> Result<AuthResponse, AuthApiError> {
        Ok(AuthResponse {
            identity,
            token: token.to_string(),
        })
    }

    fn snapshot(identity: &Identity) -> String {
        serde_json::to_string(identity).expect("serialize")
    }

    #[tokio::test]
    async fn restore_without_persisted_state_settles_empty() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(StubApi::new(), storage.clone());
        assert!(store.session().is_loading());

        store.restore().await;

        assert_eq!(store.session(), Session::anonymous());
        assert!(store.api().calls().is_empty());
    }

    #[tokio::test]
    async fn restore_roundtrip_reproduces_session() {
        let storage = MemoryStorage::new();
        let before = SessionStore::new(
            StubApi::new().with_login(granted(vet(), "tok-1")),
            storage.clone(),
        );
        before.restore().await;
        assert!(before.login("ada@clinic.test", "secret").await.is_success());

        let reloaded = SessionStore::new(StubApi::new().with_verify(Ok(vet())), storage.clone());
        reloaded.restore().await;

        assert_eq!(reloaded.session(), before.session());
        assert_eq!(reloaded.api().calls(), vec!["verify:tok-1".to_string()]);
    }

    #[tokio::test]
    async fn restore_prefers_server_identity_over_snapshot() {
        let stale = vet();
        let mut fresh = vet();
        fresh.apply(ProfilePatch::default().name("Dr. Ada Lovelace"));

        let storage = MemoryStorage::with_session("tok", &snapshot(&stale));
        let store = SessionStore::new(StubApi::new().with_verify(Ok(fresh.clone())), storage.clone());
        store.restore().await;

        assert_eq!(store.session(), Session::authenticated(fresh.clone()));
        assert_eq!(storage.identity_snapshot(), Some(snapshot(&fresh)));
        assert_eq!(storage.token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn restore_shows_snapshot_while_verifying() {
        let gate = Arc::new(Notify::new());
        let storage = MemoryStorage::with_session("tok", &snapshot(&vet()));
        let store = SessionStore::new(
            StubApi::new().with_verify(Ok(vet())).gate_verify(Arc::clone(&gate)),
            storage,
        );

        let ((), during) = tokio::join!(store.restore(), async {
            let during = store.session();
            gate.notify_one();
            during
        });

        assert!(during.is_loading());
        assert_eq!(during.identity(), Some(&vet()));
        assert!(!store.session().is_loading());
    }

    #[tokio::test]
    async fn restore_verifies_token_without_snapshot() {
        let storage = MemoryStorage::new();
        storage.save("tok", "not json");
        let store = SessionStore::new(StubApi::new().with_verify(Ok(vet())), storage.clone());

        store.restore().await;

        assert_eq!(store.session(), Session::authenticated(vet()));
        assert_eq!(storage.identity_snapshot(), Some(snapshot(&vet())));
    }

    #[tokio::test]
    async fn restore_with_rejected_token_clears_everything() {
        let storage = MemoryStorage::with_session("expired", &snapshot(&vet()));
        let store = SessionStore::new(
            StubApi::new().with_verify(Err(AuthApiError::Unauthorized { message: None })),
            storage.clone(),
        );

        store.restore().await;

        assert_eq!(store.session(), Session::anonymous());
        assert!(storage.token().is_none());
        assert!(storage.identity_snapshot().is_none());
    }

    #[tokio::test]
    async fn restore_treats_network_error_as_no_session() {
        let storage = MemoryStorage::with_session("tok", &snapshot(&vet()));
        let store = SessionStore::new(StubApi::new(), storage.clone());

        store.restore().await;

        let session = store.session();
        assert!(!session.is_authenticated());
        assert!(session.last_error().is_none());
        assert!(storage.token().is_none());
    }

    #[tokio::test]
    async fn restore_drops_snapshot_without_token() {
        let storage = MemoryStorage::new();
        storage.save_identity_snapshot(&snapshot(&vet()));
        let store = SessionStore::new(StubApi::new().with_verify(Ok(vet())), storage.clone());

        store.restore().await;

        assert_eq!(store.session(), Session::anonymous());
        assert!(storage.identity_snapshot().is_none());
        assert!(store.api().calls().is_empty());
    }

    #[tokio::test]
    async fn login_success_persists_token_and_snapshot() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(StubApi::new().with_login(granted(vet(), "tok")), storage.clone());
        store.restore().await;

        let outcome = store.login("ada@clinic.test", "secret").await;

        assert_eq!(outcome, AuthOutcome::Success(vet()));
        assert_eq!(store.session(), Session::authenticated(vet()));
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(storage.identity_snapshot(), Some(snapshot(&vet())));
        assert_eq!(store.api().calls(), vec!["login:ada@clinic.test".to_string()]);
    }

    #[tokio::test]
    async fn login_failure_reports_server_message() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(
            StubApi::new().with_login(Err(AuthApiError::Unauthorized {
                message: Some("Invalid credentials".to_string()),
            })),
            storage.clone(),
        );
        store.restore().await;

        let outcome = store.login("ada@clinic.test", "wrong").await;

        assert_eq!(outcome.message(), Some("Invalid credentials"));
        let session = store.session();
        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(session.last_error(), Some("Invalid credentials"));
        assert!(storage.token().is_none());
    }

    #[tokio::test]
    async fn login_failure_without_message_uses_fallback() {
        let store = SessionStore::new(StubApi::new(), MemoryStorage::new());
        store.restore().await;

        let outcome = store.login("ada@clinic.test", "secret").await;

        assert_eq!(
            outcome,
            AuthOutcome::Failure {
                message: LOGIN_FAILED.to_string()
            }
        );
        assert_eq!(store.session().last_error(), Some(LOGIN_FAILED));
    }

    #[tokio::test]
    async fn register_logs_in_implicitly() {
        let client = Identity::new(UserId::from("c7"), "Sam", "sam@example.com", Role::Client);
        let storage = MemoryStorage::new();
        let store = SessionStore::new(
            StubApi::new().with_register(granted(client.clone(), "fresh")),
            storage.clone(),
        );
        store.restore().await;

        let outcome = store
            .register(RegistrationRequest::new("Sam", "sam@example.com", "hunter22"))
            .await;

        assert!(outcome.is_success());
        assert_eq!(store.session(), Session::authenticated(client));
        assert_eq!(storage.token().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn register_failure_uses_registration_fallback() {
        let store = SessionStore::new(
            StubApi::new().with_register(Err(AuthApiError::Rejected {
                status: 500,
                message: None,
            })),
            MemoryStorage::new(),
        );
        store.restore().await;

        let outcome = store
            .register(RegistrationRequest::new("Sam", "sam@example.com", "hunter22"))
            .await;

        assert_eq!(outcome.message(), Some(REGISTRATION_FAILED));
        assert_eq!(store.session().last_error(), Some(REGISTRATION_FAILED));
    }

    #[tokio::test]
    async fn logout_clears_even_when_endpoint_fails() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(
            StubApi::new()
                .with_login(granted(vet(), "tok"))
                .with_logout(Err(transport_error())),
            storage.clone(),
        );
        store.restore().await;
        store.login("ada@clinic.test", "secret").await;

        store.logout().await;

        assert_eq!(store.session(), Session::anonymous());
        assert!(storage.token().is_none());
        assert!(storage.identity_snapshot().is_none());
        assert!(store.api().calls().contains(&"logout:tok".to_string()));
    }

    #[tokio::test]
    async fn logout_clears_last_error() {
        let store = SessionStore::new(StubApi::new(), MemoryStorage::new());
        store.restore().await;
        store.login("a@b.c", "x").await;

        store.logout().await;

        assert!(store.session().last_error().is_none());
        assert!(
            !store
                .api()
                .calls()
                .iter()
                .any(|call| call.starts_with("logout"))
        );
    }

    #[tokio::test]
    async fn logout_supersedes_in_flight_login() {
        let gate = Arc::new(Notify::new());
        let storage = MemoryStorage::new();
        let store = SessionStore::new(
            StubApi::new()
                .with_login(granted(vet(), "late"))
                .gate_login(Arc::clone(&gate)),
            storage.clone(),
        );
        store.restore().await;

        let (outcome, ()) = tokio::join!(store.login("ada@clinic.test", "secret"), async {
            store.logout().await;
            gate.notify_one();
        });

        assert_eq!(outcome, AuthOutcome::Superseded);
        assert_eq!(store.session(), Session::anonymous());
        assert!(storage.token().is_none());
    }

    #[tokio::test]
    async fn login_supersedes_in_flight_restore() {
        let gate = Arc::new(Notify::new());
        let storage = MemoryStorage::with_session("old", &snapshot(&vet()));
        let store = SessionStore::new(
            StubApi::new()
                .with_verify(Err(AuthApiError::Unauthorized { message: None }))
                .gate_verify(Arc::clone(&gate))
                .with_login(granted(vet(), "new")),
            storage.clone(),
        );

        let ((), outcome) = tokio::join!(store.restore(), async {
            let outcome = store.login("ada@clinic.test", "secret").await;
            gate.notify_one();
            outcome
        });

        assert!(outcome.is_success());
        assert_eq!(store.session(), Session::authenticated(vet()));
        assert_eq!(storage.token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn failed_login_during_restore_drops_unverified_snapshot() {
        let gate = Arc::new(Notify::new());
        let storage = MemoryStorage::with_session("expired", &snapshot(&vet()));
        let store = SessionStore::new(
            StubApi::new()
                .with_verify(Err(AuthApiError::Unauthorized { message: None }))
                .gate_verify(Arc::clone(&gate))
                .with_login(Err(AuthApiError::Unauthorized {
                    message: Some("Invalid credentials".to_string()),
                })),
            storage.clone(),
        );

        let ((), outcome) = tokio::join!(store.restore(), async {
            let outcome = store.login("ada@clinic.test", "wrong").await;
            gate.notify_one();
            outcome
        });

        assert_eq!(outcome.message(), Some("Invalid credentials"));
        let session = store.session();
        assert!(session.identity().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.last_error(), Some("Invalid credentials"));
        assert!(storage.token().is_none());
        assert!(storage.identity_snapshot().is_none());

        let guard = RouteGuard::new(AccessRequirement::new().permissions(["pets.view"]));
        assert_eq!(
            guard.evaluate(&session, "/pets"),
            GuardDecision::RedirectToLogin {
                from: "/pets".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failed_registration_during_restore_drops_unverified_snapshot() {
        let gate = Arc::new(Notify::new());
        let storage = MemoryStorage::with_session("expired", &snapshot(&vet()));
        let store = SessionStore::new(
            StubApi::new()
                .with_verify(Err(AuthApiError::Unauthorized { message: None }))
                .gate_verify(Arc::clone(&gate))
                .with_register(Err(AuthApiError::Rejected {
                    status: 422,
                    message: Some("Email already registered".to_string()),
                })),
            storage.clone(),
        );

        let ((), outcome) = tokio::join!(store.restore(), async {
            let request = RegistrationRequest::new("Ada", "ada@clinic.test", "secret");
            let outcome = store.register(request).await;
            gate.notify_one();
            outcome
        });

        assert_eq!(outcome.message(), Some("Email already registered"));
        let session = store.session();
        assert!(session.identity().is_none());
        assert!(!session.is_loading());
        assert!(storage.token().is_none());
        assert!(storage.identity_snapshot().is_none());
    }

    #[tokio::test]
    async fn failed_login_keeps_verified_session() {
        let storage = MemoryStorage::with_session("tok", &snapshot(&vet()));
        let store = SessionStore::new(
            StubApi::new().with_verify(Ok(vet())),
            storage.clone(),
        );
        store.restore().await;

        let outcome = store.login("other@clinic.test", "wrong").await;

        assert!(!outcome.is_success());
        assert_eq!(store.session().identity(), Some(&vet()));
        assert_eq!(storage.token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn login_marks_session_loading_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let store = SessionStore::new(
            StubApi::new()
                .with_login(granted(vet(), "tok"))
                .gate_login(Arc::clone(&gate)),
            MemoryStorage::new(),
        );
        store.restore().await;
        store
            .register(RegistrationRequest::new("Ada", "ada@clinic.test", "secret"))
            .await;
        assert_eq!(store.session().last_error(), Some(REGISTRATION_FAILED));

        let (outcome, during) = tokio::join!(store.login("ada@clinic.test", "secret"), async {
            let during = store.session();
            gate.notify_one();
            during
        });

        assert!(during.is_loading());
        assert!(during.last_error().is_none());
        assert!(outcome.is_success());
        assert!(!store.session().is_loading());
    }

    #[tokio::test]
    async fn register_marks_session_loading_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let store = SessionStore::new(
            StubApi::new()
                .with_register(granted(vet(), "tok"))
                .gate_register(Arc::clone(&gate)),
            MemoryStorage::new(),
        );
        store.restore().await;
        store.login("ada@clinic.test", "secret").await;
        assert_eq!(store.session().last_error(), Some(LOGIN_FAILED));

        let request = RegistrationRequest::new("Ada", "ada@clinic.test", "secret");
        let (outcome, during) = tokio::join!(store.register(request), async {
            let during = store.session();
            gate.notify_one();
            during
        });

        assert!(during.is_loading());
        assert!(during.last_error().is_none());
        assert!(outcome.is_success());
        assert!(!store.session().is_loading());
    }

    #[tokio::test]
    async fn update_profile_merges_and_persists() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(StubApi::new().with_login(granted(vet(), "tok")), storage.clone());
        store.restore().await;
        store.login("ada@clinic.test", "secret").await;

        assert!(store.update_profile(ProfilePatch::default().name("Dr. Ada Lovelace")));

        let session = store.session();
        let identity = session.identity().expect("identity");
        assert_eq!(identity.name(), "Dr. Ada Lovelace");
        assert_eq!(identity.email(), "ada@clinic.test");
        assert_eq!(storage.identity_snapshot(), Some(snapshot(identity)));
        assert_eq!(storage.token().as_deref(), Some("tok"));
        assert_eq!(store.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn update_profile_without_identity_is_a_no_op() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(StubApi::new(), storage.clone());
        store.restore().await;

        assert!(!store.update_profile(ProfilePatch::default().name("Nobody")));
        assert_eq!(store.session(), Session::anonymous());
        assert!(storage.identity_snapshot().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let store = SessionStore::new(StubApi::new().with_login(granted(vet(), "tok")), MemoryStorage::new());
        let mut updates = store.subscribe();
        store.restore().await;
        store.login("ada@clinic.test", "secret").await;

        assert!(updates.has_changed().expect("sender alive"));
        let latest = updates.borrow_and_update().clone();
        assert_eq!(latest, Session::authenticated(vet()));
    }
}
