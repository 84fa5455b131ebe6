//! Fragment-level authorization.

use crate::guard::AccessRequirement;
use crate::identity::Identity;

/// Whether an inline fragment or its fallback should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the fragment.
    Show,
    /// Render the caller's fallback, or nothing.
    Fallback,
}

/// Shows or hides a button, menu entry or page section.
///
/// Unlike [`crate::RouteGuard`] it never redirects and ignores the session's
/// loading flag: without an identity the fallback renders immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderGate {
    requirement: AccessRequirement,
}

impl RenderGate {
    /// Creates a gate for `requirement`.
    #[must_use]
    pub fn new(requirement: AccessRequirement) -> Self {
        Self { requirement }
    }

    /// Decides whether `identity` sees the fragment.
    #[must_use]
    pub fn evaluate(&self, identity: Option<&Identity>) -> GateDecision {
        if self.requirement.is_satisfied_by(identity) {
            GateDecision::Show
        } else {
            GateDecision::Fallback
        }
    }

    /// Shorthand for `evaluate(..) == GateDecision::Show`.
    #[must_use]
    pub fn allows(&self, identity: Option<&Identity>) -> bool {
        self.evaluate(identity) == GateDecision::Show
    }
}
