use chrono::Utc;
use uuid::Uuid;

use assoc_domain::registration::RegistrationStatus;

use crate::domain::repository::{ActivityRepository, RegistrationRepository};
use crate::domain::types::{Activity, Registration};
use crate::error::AssociationError;

/// Parse the `status` query filter; `all` (or absence) means no filter.
pub fn parse_registration_filter(
    filter: Option<&str>,
) -> Result<Option<RegistrationStatus>, AssociationError> {
    match filter {
        None => Ok(None),
        Some("all") => Ok(None),
        Some(s) => RegistrationStatus::from_str_opt(s)
            .map(Some)
            .ok_or(AssociationError::InvalidStatus),
    }
}

// ── RegisterForActivity ──────────────────────────────────────────────────────

pub struct RegisterForActivityUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> RegisterForActivityUseCase<A, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        notes: Option<String>,
    ) -> Result<Registration, AssociationError> {
        let activity = self
            .activities
            .find_by_id(activity_id)
            .await?
            .ok_or(AssociationError::ActivityNotFound)?;

        let now = Utc::now();
        if !activity.is_registration_open(now) {
            return Err(AssociationError::RegistrationClosed);
        }
        let live = self
            .registrations
            .count_live_for_activity(activity_id)
            .await?;
        if activity.is_full(live) {
            return Err(AssociationError::ActivityFull);
        }
        if self
            .registrations
            .find_live(user_id, activity_id)
            .await?
            .is_some()
        {
            return Err(AssociationError::AlreadyRegistered);
        }

        let registration = Registration {
            id: Uuid::now_v7(),
            user_id,
            activity_id,
            status: RegistrationStatus::Registered,
            registration_time: now,
            notes: notes.filter(|v| !v.trim().is_empty()),
        };
        // The repository re-checks capacity in a transaction and the partial
        // unique index rejects duplicate inserts, so the pre-checks above are
        // only for error ordering, not correctness.
        self.registrations
            .register(&registration, activity.max_participants)
            .await?;
        Ok(registration)
    }
}

// ── CancelRegistration ───────────────────────────────────────────────────────

pub struct CancelRegistrationUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> CancelRegistrationUseCase<A, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<(), AssociationError> {
        let activity = self
            .activities
            .find_by_id(activity_id)
            .await?
            .ok_or(AssociationError::ActivityNotFound)?;
        let registration = self
            .registrations
            .find_live(user_id, activity_id)
            .await?
            .ok_or(AssociationError::RegistrationNotFound)?;
        if activity.has_started(Utc::now()) {
            return Err(AssociationError::ActivityStarted);
        }
        self.registrations
            .set_status(registration.id, RegistrationStatus::Cancelled)
            .await
    }
}

// ── ListMyRegistrations ──────────────────────────────────────────────────────

pub struct ListMyRegistrationsUseCase<R: RegistrationRepository> {
    pub repo: R,
}

impl<R: RegistrationRepository> ListMyRegistrationsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        status_filter: Option<&str>,
    ) -> Result<Vec<(Registration, Activity)>, AssociationError> {
        let status = parse_registration_filter(status_filter)?;
        self.repo.list_for_user(user_id, status).await
    }
}

// ── CheckRegistrationStatus ──────────────────────────────────────────────────

pub struct CheckRegistrationStatusUseCase<R: RegistrationRepository> {
    pub repo: R,
}

impl<R: RegistrationRepository> CheckRegistrationStatusUseCase<R> {
    /// Returns the most recent registration, cancelled ones included, so the
    /// client can show "已取消" rather than treating the user as unregistered.
    pub async fn execute(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<Option<Registration>, AssociationError> {
        self.repo.find_latest(user_id, activity_id).await
    }
}
