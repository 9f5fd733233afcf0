#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::pagination::PageRequest;
use assoc_domain::registration::RegistrationStatus;
use assoc_domain::user::UserRole;

use crate::domain::types::{Activity, ProfileChanges, Registration, User};
use crate::error::AssociationError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AssociationError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AssociationError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AssociationError>;
    /// All users, newest first, optionally filtered by role.
    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, AssociationError>;
    async fn create(&self, user: &User) -> Result<(), AssociationError>;
    /// Apply profile changes and return the updated user.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<User, AssociationError>;
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<User, AssociationError>;
    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AssociationError>;
    async fn count(&self, role: Option<UserRole>) -> Result<u64, AssociationError>;
}

/// Repository for activities.
pub trait ActivityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, AssociationError>;
    /// One page of activities, created_at descending, with the total count.
    async fn list(
        &self,
        status: Option<ActivityStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Activity>, u64), AssociationError>;
    /// All activities, created_at descending (dashboard views).
    async fn list_all(
        &self,
        status: Option<ActivityStatus>,
    ) -> Result<Vec<Activity>, AssociationError>;
    async fn create(&self, activity: &Activity) -> Result<(), AssociationError>;
    /// Persist all mutable fields of an already-merged activity.
    async fn update(&self, activity: &Activity) -> Result<(), AssociationError>;
    /// Hard delete. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AssociationError>;
    async fn update_status(
        &self,
        id: Uuid,
        status: ActivityStatus,
    ) -> Result<(), AssociationError>;
    async fn count(&self, status: Option<ActivityStatus>) -> Result<u64, AssociationError>;
    /// Most recently created activities.
    async fn recent(&self, limit: u64) -> Result<Vec<Activity>, AssociationError>;
    /// Active activities starting after `after`, soonest first.
    async fn upcoming(
        &self,
        after: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Activity>, AssociationError>;
}

/// Repository for registrations.
pub trait RegistrationRepository: Send + Sync {
    /// The user's non-cancelled registration for the activity, if any.
    async fn find_live(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<Option<Registration>, AssociationError>;
    /// The user's most recent registration for the activity, any status.
    async fn find_latest(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<Option<Registration>, AssociationError>;
    /// Insert a registration, re-checking capacity inside one transaction.
    ///
    /// Fails with `ActivityFull` when `capacity` is reached and with
    /// `AlreadyRegistered` when the partial unique index rejects the insert.
    async fn register(
        &self,
        registration: &Registration,
        capacity: Option<i32>,
    ) -> Result<(), AssociationError>;
    async fn set_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<(), AssociationError>;
    /// The user's registrations joined with their activities, newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<(Registration, Activity)>, AssociationError>;
    /// All registrations for an activity joined with the registrant.
    async fn list_participants(
        &self,
        activity_id: Uuid,
    ) -> Result<Vec<(Registration, User)>, AssociationError>;
    async fn count(
        &self,
        status: Option<RegistrationStatus>,
    ) -> Result<u64, AssociationError>;
    async fn count_for_activity(
        &self,
        activity_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<u64, AssociationError>;
    async fn count_for_user(
        &self,
        user_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<u64, AssociationError>;
    /// Non-cancelled registrations for an activity (capacity accounting).
    async fn count_live_for_activity(
        &self,
        activity_id: Uuid,
    ) -> Result<u64, AssociationError>;
    /// Set `status` on every existing id; missing ids are skipped.
    /// Returns the number of rows updated.
    async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        status: RegistrationStatus,
    ) -> Result<u64, AssociationError>;
}
