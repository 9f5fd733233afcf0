//! Registration domain types.

use serde::{Deserialize, Serialize};

/// Status of a user's registration for an activity.
///
/// `Cancelled` records are retained; a registration is never physically
/// removed by user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
    Attended,
}

impl RegistrationStatus {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn from_str_opt(v: &str) -> Option<Self> {
        match v {
            "registered" => Some(Self::Registered),
            "cancelled" => Some(Self::Cancelled),
            "attended" => Some(Self::Attended),
            _ => None,
        }
    }

    /// String value used in the database and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Cancelled => "cancelled",
            Self::Attended => "attended",
        }
    }
}
