//! Session lifecycle and access control for vetdesk.
//!
//! This crate holds who is logged in and decides what they may see:
//!
//! - [`SessionStore`] restores, logs in, registers and logs out, persisting
//!   the bearer token and an identity snapshot through [`SessionStorage`].
//! - [`permission`] answers role and permission questions, with the
//!   administrator bypass applied to permission checks only.
//! - [`RouteGuard`] gates whole views; [`RenderGate`] gates inline fragments.
//!
//! # Example
//!
//! ```
//! use vetdesk_access::{AccessRequirement, Identity, RenderGate, Role, permission};
//! use vetdesk_core::UserId;
//!
//! let vet = Identity::new(UserId::from("12"), "Dr. Reyes", "reyes@clinic.test", Role::Veterinarian)
//!     .with_permissions(["pets.view", "appointments.view"].into_iter().collect());
//!
//! assert!(permission::has_permission(Some(&vet), "pets.view"));
//! assert!(!permission::has_permission(Some(&vet), "pets.delete"));
//!
//! let delete_button = RenderGate::new(AccessRequirement::new().permissions(["pets.delete"]));
//! assert!(!delete_button.allows(Some(&vet)));
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod guard;
pub mod identity;
pub mod permission;
pub mod role;
pub mod session;
pub mod storage;
pub mod store;

pub use api::{
    AuthApi, AuthResponse, LoginRequest, RegistrationRequest, VerifyResponse, bearer_header,
};
pub use client::HttpAuthApi;
pub use config::AccessConfig;
pub use error::AuthApiError;
pub use gate::{GateDecision, RenderGate};
pub use guard::{AccessRequirement, GuardDecision, RouteGuard, login_redirect, return_target};
pub use identity::{Identity, PermissionSet, ProfilePatch};
pub use role::{Role, UnknownRole};
pub use session::{AuthOutcome, Session};
#[cfg(feature = "browser")]
pub use storage::BrowserStorage;
pub use storage::{MemoryStorage, SessionStorage};
pub use store::SessionStore;
