//! Client-side session state.
//!
//! A [`Session`] wraps zero or one [`Identity`] together with the loading
//! flag and the last login/registration failure. Only the session store
//! mutates it; everything else reads snapshots.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Who is logged in, and whether that is still being determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<Identity>,
    loading: bool,
    last_error: Option<String>,
    /// Set while a persisted token awaits server verification; any identity
    /// held meanwhile is the unconfirmed snapshot.
    #[serde(skip)]
    verifying: bool,
}

impl Session {
    /// A session at application start, before restoration has run.
    #[must_use]
    pub fn restoring() -> Self {
        Self {
            identity: None,
            loading: true,
            last_error: None,
            verifying: false,
        }
    }

    /// A settled session with nobody logged in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            loading: false,
            last_error: None,
            verifying: false,
        }
    }

    /// A settled session for `identity`.
    #[must_use]
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
            last_error: None,
            verifying: false,
        }
    }

    /// Returns the logged-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns true while restoration or a login/registration call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns why the last login or registration failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns true if an identity is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Starts a login or registration.
    ///
    /// Returns true if this interrupted a verification; the unconfirmed
    /// snapshot identity is dropped in that case.
    pub(crate) fn begin_loading(&mut self) -> bool {
        let interrupted = std::mem::take(&mut self.verifying);
        if interrupted {
            self.identity = None;
        }
        self.loading = true;
        self.last_error = None;
        interrupted
    }

    /// Starts verifying a persisted token, showing `cached` until the
    /// server answers.
    pub(crate) fn begin_verifying(&mut self, cached: Option<Identity>) {
        self.identity = cached;
        self.loading = true;
        self.verifying = true;
    }

    pub(crate) fn settle_authenticated(&mut self, identity: Identity) {
        *self = Self::authenticated(identity);
    }

    pub(crate) fn settle_anonymous(&mut self) {
        *self = Self::anonymous();
    }

    pub(crate) fn settle_failed(&mut self, message: String) {
        self.loading = false;
        self.last_error = Some(message);
    }

    pub(crate) fn identity_mut(&mut self) -> Option<&mut Identity> {
        self.identity.as_mut()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::restoring()
    }
}

/// Result of a login or registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session now holds this identity.
    Success(Identity),
    /// The attempt failed; the message is also stored as the session's
    /// last error.
    Failure { message: String },
    /// A newer session operation started before the response arrived; the
    /// response was discarded.
    Superseded,
}

impl AuthOutcome {
    /// Returns true if the attempt logged the user in.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the failure message, if the attempt failed.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => Some(message),
            Self::Success(_) | Self::Superseded => None,
        }
    }
}
