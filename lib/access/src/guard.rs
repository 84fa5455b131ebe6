//! Navigation-level authorization.
//!
//! A [`RouteGuard`] is evaluated on every render of a protected view and
//! decides between a loading placeholder, a redirect, a fallback view and
//! the view itself. Denial is an ordinary decision, never an error.
//!
//! # Example
//!
//! ```
//! use vetdesk_access::{AccessRequirement, GuardDecision, Identity, Role, RouteGuard, Session};
//! use vetdesk_core::UserId;
//!
//! let guard = RouteGuard::new(AccessRequirement::new().permissions(["users.view"]));
//!
//! let client = Identity::new(UserId::from("7"), "Sam", "sam@example.com", Role::Client);
//! assert_eq!(
//!     guard.evaluate(&Session::authenticated(client), "/users"),
//!     GuardDecision::RedirectUnauthorized,
//! );
//!
//! let admin = Identity::new(UserId::from("1"), "Root", "root@clinic.test", Role::Administrator);
//! assert_eq!(guard.evaluate(&Session::authenticated(admin), "/users"), GuardDecision::Render);
//! ```

use crate::identity::Identity;
use crate::permission;
use crate::role::Role;
use crate::session::Session;

/// Role and permission requirements of a view or fragment.
///
/// Roles and permissions are independent gates; both must pass. Empty
/// lists impose no requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    roles: Vec<Role>,
    permissions: Vec<String>,
    require_all: bool,
}

impl AccessRequirement {
    /// A requirement that any authenticated identity satisfies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires one of `roles`.
    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Requires the listed permissions; any one suffices unless
    /// [`AccessRequirement::require_all`] is set.
    #[must_use]
    pub fn permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Requires every listed permission instead of any one.
    #[must_use]
    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    /// Returns the required roles.
    #[must_use]
    pub fn required_roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the required permissions.
    #[must_use]
    pub fn required_permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Returns true if every listed permission is required.
    #[must_use]
    pub fn requires_all(&self) -> bool {
        self.require_all
    }

    fn roles_satisfied(&self, identity: Option<&Identity>) -> bool {
        match self.roles.as_slice() {
            [] => true,
            [role] => permission::has_role(identity, *role),
            roles => permission::has_any_role(identity, roles.iter().copied()),
        }
    }

    fn permissions_satisfied(&self, identity: Option<&Identity>) -> bool {
        match self.permissions.as_slice() {
            [] => true,
            all if self.require_all => permission::has_all_permissions(identity, all),
            [single] => permission::has_permission(identity, single),
            any => permission::has_any_permission(identity, any),
        }
    }

    /// Returns true if `identity` passes both the role and permission gates.
    ///
    /// An absent identity never satisfies a requirement.
    #[must_use]
    pub fn is_satisfied_by(&self, identity: Option<&Identity>) -> bool {
        identity.is_some() && self.roles_satisfied(identity) && self.permissions_satisfied(identity)
    }
}

/// What a protected view should do on this render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being determined; show a placeholder.
    Loading,
    /// Nobody is logged in; go to the login view and come back to `from`.
    RedirectToLogin { from: String },
    /// The visitor lacks a required role or permission.
    RedirectUnauthorized,
    /// The visitor lacks a required role or permission and the view
    /// supplied a fallback to render in place.
    Fallback,
    /// Render the requested view.
    Render,
}

/// Per-view authorization gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    requirement: AccessRequirement,
    has_fallback: bool,
}

impl RouteGuard {
    /// Creates a guard that redirects on denial.
    #[must_use]
    pub fn new(requirement: AccessRequirement) -> Self {
        Self {
            requirement,
            has_fallback: false,
        }
    }

    /// Renders a fallback instead of redirecting on denial.
    #[must_use]
    pub fn with_fallback(mut self, has_fallback: bool) -> Self {
        self.has_fallback = has_fallback;
        self
    }

    /// Returns the guarded requirement.
    #[must_use]
    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    /// Decides what to render for a visit to `location`.
    #[must_use]
    pub fn evaluate(&self, session: &Session, location: &str) -> GuardDecision {
        if session.is_loading() {
            return GuardDecision::Loading;
        }

        let Some(identity) = session.identity() else {
            return GuardDecision::RedirectToLogin {
                from: location.to_string(),
            };
        };

        let identity = Some(identity);
        if !self.requirement.roles_satisfied(identity)
            || !self.requirement.permissions_satisfied(identity)
        {
            return if self.has_fallback {
                GuardDecision::Fallback
            } else {
                GuardDecision::RedirectUnauthorized
            };
        }

        GuardDecision::Render
    }
}

/// Builds the login redirect target carrying the requested location.
#[must_use]
pub fn login_redirect(login_path: &str, from: &str) -> String {
    if from.is_empty() || from == "/" {
        return login_path.to_string();
    }
    format!("{login_path}?from={}", urlencoding::encode(from))
}

/// Picks where to go after logging in.
///
/// Only same-origin absolute paths are honored; anything else lands on `/`.
#[must_use]
pub fn return_target(from: Option<&str>) -> String {
    match from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}
