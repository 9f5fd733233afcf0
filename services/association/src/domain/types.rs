use chrono::{DateTime, Utc};
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::registration::RegistrationStatus;
use assoc_domain::user::UserRole;

/// User account. `password_hash` never leaves the service boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Activity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub status: ActivityStatus,
    pub image_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Registration is open while the activity is active and the deadline
    /// has not passed.
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        self.status == ActivityStatus::Active && now <= self.registration_deadline
    }

    /// Full when a capacity is set and the live registration count reaches it.
    pub fn is_full(&self, live_registrations: u64) -> bool {
        match self.max_participants {
            Some(max) => live_registrations >= max.max(0) as u64,
            None => false,
        }
    }

    /// Cancellation is allowed only before the activity starts.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_time
    }
}

/// Registration join record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_id: Uuid,
    pub status: RegistrationStatus,
    pub registration_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Mutable profile fields; `Some` means "apply this change".
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.department.is_none()
            && self.major.is_none()
            && self.password_hash.is_none()
    }
}

/// Check the scheduling invariants: `start ≤ end` and `deadline ≤ start`.
pub fn dates_ordered(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> bool {
    start <= end && deadline <= start
}
