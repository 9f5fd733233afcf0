//! JSON representations shared across handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::types::{Activity, Registration, User};
use crate::usecase::activity::ActivityWithCount;

#[derive(Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms_opt")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role.as_str().to_owned(),
            student_id: user.student_id,
            phone: user.phone,
            department: user.department,
            major: user.major,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[derive(Serialize)]
pub struct ActivityDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub end_time: DateTime<Utc>,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub status: String,
    pub image_url: Option<String>,
    pub created_by: Uuid,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_participants: Option<u64>,
}

impl From<Activity> for ActivityDto {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            title: activity.title,
            description: activity.description,
            location: activity.location,
            start_time: activity.start_time,
            end_time: activity.end_time,
            registration_deadline: activity.registration_deadline,
            max_participants: activity.max_participants,
            status: activity.status.as_str().to_owned(),
            image_url: activity.image_url,
            created_by: activity.created_by,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
            current_participants: None,
        }
    }
}

impl From<ActivityWithCount> for ActivityDto {
    fn from(counted: ActivityWithCount) -> Self {
        let mut dto = Self::from(counted.activity);
        dto.current_participants = Some(counted.current_participants);
        dto
    }
}

#[derive(Serialize)]
pub struct RegistrationDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_id: Uuid,
    pub status: String,
    #[serde(serialize_with = "assoc_core::serde::to_rfc3339_ms")]
    pub registration_time: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<Registration> for RegistrationDto {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id,
            user_id: registration.user_id,
            activity_id: registration.activity_id,
            status: registration.status.as_str().to_owned(),
            registration_time: registration.registration_time,
            notes: registration.notes,
        }
    }
}

/// Bare `{success, message}` envelope for mutations with no payload.
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
        }
    }
}
