//! Activity domain types.

use serde::{Deserialize, Serialize};

/// Publication status of an activity.
///
/// Wire format: lowercase string (`"active"` / `"cancelled"` / `"completed"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Active,
    Cancelled,
    Completed,
}

impl ActivityStatus {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn from_str_opt(v: &str) -> Option<Self> {
        match v {
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// String value used in the database and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}
