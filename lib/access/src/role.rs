//! Roles assigned to clinic accounts.
//!
//! The role set is closed. Roles are assigned by the server at account
//! creation and only change through administration flows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse-grained category of an authenticated account.
///
/// - `Administrator`: clinic staff with unrestricted access
/// - `Veterinarian`: clinical staff
/// - `Client`: pet owners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Unrestricted access; every permission check passes.
    #[serde(rename = "admin", alias = "administrator")]
    Administrator,
    /// Clinical staff.
    #[serde(rename = "veterinarian")]
    Veterinarian,
    /// Pet owner.
    #[serde(rename = "client")]
    Client,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Self::Administrator, Self::Veterinarian, Self::Client];

    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Veterinarian => "veterinarian",
            Self::Client => "client",
        }
    }

    /// Returns true if this role bypasses permission checks.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not part of the closed role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" | "administrator" => Ok(Self::Administrator),
            "veterinarian" => Ok(Self::Veterinarian),
            "client" => Ok(Self::Client),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
