use chrono::Utc;
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::registration::RegistrationStatus;
use assoc_domain::user::UserRole;

use crate::domain::repository::{ActivityRepository, RegistrationRepository, UserRepository};
use crate::domain::types::{Activity, User};
use crate::error::AssociationError;
use crate::usecase::activity::parse_status_filter;

// ── DashboardStats ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DashboardStats {
    pub total_users: u64,
    pub student_users: u64,
    pub admin_users: u64,
    pub total_activities: u64,
    pub active_activities: u64,
    pub completed_activities: u64,
    pub cancelled_activities: u64,
    pub total_registrations: u64,
    pub active_registrations: u64,
    pub attended_registrations: u64,
    pub cancelled_registrations: u64,
    pub recent_activities: Vec<Activity>,
    pub upcoming_activities: Vec<Activity>,
}

pub struct DashboardStatsUseCase<
    U: UserRepository,
    A: ActivityRepository,
    R: RegistrationRepository,
> {
    pub users: U,
    pub activities: A,
    pub registrations: R,
}

impl<U: UserRepository, A: ActivityRepository, R: RegistrationRepository>
    DashboardStatsUseCase<U, A, R>
{
    pub async fn execute(&self) -> Result<DashboardStats, AssociationError> {
        Ok(DashboardStats {
            total_users: self.users.count(None).await?,
            student_users: self.users.count(Some(UserRole::Student)).await?,
            admin_users: self.users.count(Some(UserRole::Admin)).await?,
            total_activities: self.activities.count(None).await?,
            active_activities: self
                .activities
                .count(Some(ActivityStatus::Active))
                .await?,
            completed_activities: self
                .activities
                .count(Some(ActivityStatus::Completed))
                .await?,
            cancelled_activities: self
                .activities
                .count(Some(ActivityStatus::Cancelled))
                .await?,
            total_registrations: self.registrations.count(None).await?,
            active_registrations: self
                .registrations
                .count(Some(RegistrationStatus::Registered))
                .await?,
            attended_registrations: self
                .registrations
                .count(Some(RegistrationStatus::Attended))
                .await?,
            cancelled_registrations: self
                .registrations
                .count(Some(RegistrationStatus::Cancelled))
                .await?,
            recent_activities: self.activities.recent(5).await?,
            upcoming_activities: self.activities.upcoming(Utc::now(), 5).await?,
        })
    }
}

// ── ActivitiesWithStats ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ActivityStats {
    pub activity: Activity,
    pub total_registrations: u64,
    pub active_registrations: u64,
}

pub struct ActivitiesWithStatsUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> ActivitiesWithStatsUseCase<A, R> {
    pub async fn execute(
        &self,
        status_filter: Option<&str>,
    ) -> Result<Vec<ActivityStats>, AssociationError> {
        let status = parse_status_filter(status_filter)?;
        let activities = self.activities.list_all(status).await?;
        let mut stats = Vec::with_capacity(activities.len());
        for activity in activities {
            let total_registrations = self
                .registrations
                .count_for_activity(activity.id, None)
                .await?;
            let active_registrations = self
                .registrations
                .count_for_activity(activity.id, Some(RegistrationStatus::Registered))
                .await?;
            stats.push(ActivityStats {
                activity,
                total_registrations,
                active_registrations,
            });
        }
        Ok(stats)
    }
}

// ── UsersWithStats ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct UserStats {
    pub user: User,
    pub total_registrations: u64,
    pub active_registrations: u64,
}

pub struct UsersWithStatsUseCase<U: UserRepository, R: RegistrationRepository> {
    pub users: U,
    pub registrations: R,
}

impl<U: UserRepository, R: RegistrationRepository> UsersWithStatsUseCase<U, R> {
    pub async fn execute(
        &self,
        role_filter: Option<&str>,
    ) -> Result<Vec<UserStats>, AssociationError> {
        let role = match role_filter {
            None | Some("all") => None,
            Some(s) => Some(UserRole::from_str_opt(s).ok_or(AssociationError::InvalidRole)?),
        };
        let users = self.users.list(role).await?;
        let mut stats = Vec::with_capacity(users.len());
        for user in users {
            let total_registrations =
                self.registrations.count_for_user(user.id, None).await?;
            let active_registrations = self
                .registrations
                .count_for_user(user.id, Some(RegistrationStatus::Registered))
                .await?;
            stats.push(UserStats {
                user,
                total_registrations,
                active_registrations,
            });
        }
        Ok(stats)
    }
}

// ── ExportParticipants ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ParticipantsCsv {
    pub filename: String,
    pub content: String,
}

pub struct ExportParticipantsUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> ExportParticipantsUseCase<A, R> {
    pub async fn execute(
        &self,
        activity_id: Uuid,
    ) -> Result<ParticipantsCsv, AssociationError> {
        let activity = self
            .activities
            .find_by_id(activity_id)
            .await?
            .ok_or(AssociationError::ActivityNotFound)?;
        let participants = self.registrations.list_participants(activity_id).await?;

        let mut content = String::from("序号,用户名,姓名,学号,院系,专业,电话,邮箱,报名时间,状态,备注\n");
        for (index, (registration, user)) in participants.iter().enumerate() {
            let row = [
                (index + 1).to_string(),
                user.username.clone(),
                user.full_name.clone(),
                user.student_id.clone().unwrap_or_default(),
                user.department.clone().unwrap_or_default(),
                user.major.clone().unwrap_or_default(),
                user.phone.clone().unwrap_or_default(),
                user.email.clone(),
                registration
                    .registration_time
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                registration.status.as_str().to_owned(),
                registration.notes.clone().unwrap_or_default(),
            ];
            let line: Vec<String> = row.iter().map(|field| csv_escape(field)).collect();
            content.push_str(&line.join(","));
            content.push('\n');
        }

        let filename = format!(
            "participants_{}_{}.csv",
            activity.id.simple(),
            Utc::now().format("%Y%m%d%H%M%S")
        );
        Ok(ParticipantsCsv { filename, content })
    }
}

/// Quote a CSV field only when it contains a comma or a quote; internal
/// quotes are doubled.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

// ── BulkUpdateRegistrationStatus ─────────────────────────────────────────────

pub struct BulkUpdateRegistrationStatusUseCase<R: RegistrationRepository> {
    pub repo: R,
}

impl<R: RegistrationRepository> BulkUpdateRegistrationStatusUseCase<R> {
    pub async fn execute(
        &self,
        ids: &[Uuid],
        status: &str,
    ) -> Result<u64, AssociationError> {
        // An empty id list is a no-op, not an error; the caller gets back 0.
        let status =
            RegistrationStatus::from_str_opt(status).ok_or(AssociationError::InvalidStatus)?;
        self.repo.bulk_update_status(ids, status).await
    }
}
