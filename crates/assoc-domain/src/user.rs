//! User domain types.

use serde::{Deserialize, Serialize};

/// User access level.
///
/// Wire format: lowercase string (`"admin"` / `"student"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Student,
}

impl UserRole {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn from_str_opt(v: &str) -> Option<Self> {
        match v {
            "admin" => Some(Self::Admin),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// String value used in the database and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
