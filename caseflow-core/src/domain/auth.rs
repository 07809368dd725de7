//! Caller identity and role gating
//!
//! Role checks are made against an explicit [`AuthContext`] handed to the
//! component that needs it, rather than an ambient global. The server
//! independently enforces the same gates; the checks here only decide what
//! the console offers before a request is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operator roles, ordered by privilege.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Operator,
    Developer,
    Admin,
}

impl Role {
    /// Version history is an audit surface, restricted to developers and
    /// admins.
    pub fn can_view_versions(self) -> bool {
        self >= Role::Developer
    }

    /// Rollback rewinds live configuration and shares the history gate.
    pub fn can_rollback(self) -> bool {
        self >= Role::Developer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Viewer => "viewer",
            Role::Operator => "operator",
            Role::Developer => "developer",
            Role::Admin => "admin",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "operator" => Ok(Role::Operator),
            "developer" => Ok(Role::Developer),
            "admin" => Ok(Role::Admin),
            other => Err(format!(
                "unknown role '{}', expected viewer, operator, developer, or admin",
                other
            )),
        }
    }
}

/// The calling user, passed explicitly to role-gated components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}
