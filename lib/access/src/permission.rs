//! Role and permission predicates over the current identity.
//!
//! Every function here is pure and returns `false` when no identity is
//! present. The administrator bypass applies to the permission predicates
//! only; role predicates compare roles literally.
//!
//! # Example
//!
//! ```
//! use vetdesk_access::{Identity, Role, permission};
//! use vetdesk_core::UserId;
//!
//! let admin = Identity::new(UserId::from("1"), "Root", "root@clinic.test", Role::Administrator);
//! assert!(permission::has_permission(Some(&admin), "pets.delete"));
//! assert!(!permission::has_role(Some(&admin), Role::Veterinarian));
//! assert!(!permission::has_permission(None, "pets.view"));
//! ```

use crate::identity::Identity;
use crate::role::Role;

/// Returns true if the identity holds `permission`.
#[must_use]
pub fn has_permission(identity: Option<&Identity>, permission: &str) -> bool {
    match identity {
        None => false,
        Some(identity) if identity.role().is_administrator() => true,
        Some(identity) => identity.permissions().contains(permission),
    }
}

/// Returns true if the identity holds at least one of `permissions`.
///
/// An empty list satisfies nothing for non-administrators.
#[must_use]
pub fn has_any_permission<I, P>(identity: Option<&Identity>, permissions: I) -> bool
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    match identity {
        None => false,
        Some(identity) if identity.role().is_administrator() => true,
        Some(identity) => permissions
            .into_iter()
            .any(|p| identity.permissions().contains(p.as_ref())),
    }
}

/// Returns true if the identity holds every one of `permissions`.
///
/// An empty list is vacuously satisfied once an identity is present.
#[must_use]
pub fn has_all_permissions<I, P>(identity: Option<&Identity>, permissions: I) -> bool
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    match identity {
        None => false,
        Some(identity) if identity.role().is_administrator() => true,
        Some(identity) => permissions
            .into_iter()
            .all(|p| identity.permissions().contains(p.as_ref())),
    }
}

/// Returns true if the identity has exactly `role`.
#[must_use]
pub fn has_role(identity: Option<&Identity>, role: Role) -> bool {
    identity.is_some_and(|identity| identity.role() == role)
}

/// Returns true if the identity's role is one of `roles`.
#[must_use]
pub fn has_any_role<I>(identity: Option<&Identity>, roles: I) -> bool
where
    I: IntoIterator<Item = Role>,
{
    identity.is_some_and(|identity| roles.into_iter().any(|role| identity.role() == role))
}

/// Returns true if the identity is an administrator.
#[must_use]
pub fn is_administrator(identity: Option<&Identity>) -> bool {
    has_role(identity, Role::Administrator)
}
