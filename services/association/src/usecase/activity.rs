use chrono::{DateTime, Utc};
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::pagination::PageRequest;

use crate::domain::repository::{ActivityRepository, RegistrationRepository};
use crate::domain::types::{Activity, Registration, User, dates_ordered};
use crate::error::AssociationError;

/// Parse the `status` query filter; `all` (or absence) means no filter.
pub fn parse_status_filter(
    filter: Option<&str>,
) -> Result<Option<ActivityStatus>, AssociationError> {
    match filter {
        None => Ok(None),
        Some("all") => Ok(None),
        Some(s) => ActivityStatus::from_str_opt(s)
            .map(Some)
            .ok_or(AssociationError::InvalidStatus),
    }
}

/// Activity annotated with its live (non-cancelled) registration count.
#[derive(Debug, Clone)]
pub struct ActivityWithCount {
    pub activity: Activity,
    pub current_participants: u64,
}

// ── ListActivities ───────────────────────────────────────────────────────────

pub struct ActivityPage {
    pub items: Vec<ActivityWithCount>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

pub struct ListActivitiesUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> ListActivitiesUseCase<A, R> {
    pub async fn execute(
        &self,
        status_filter: Option<&str>,
        page: PageRequest,
    ) -> Result<ActivityPage, AssociationError> {
        let status = parse_status_filter(status_filter)?;
        let page = page.clamped();
        let (activities, total) = self.activities.list(status, page).await?;
        let mut items = Vec::with_capacity(activities.len());
        for activity in activities {
            let current_participants = self
                .registrations
                .count_live_for_activity(activity.id)
                .await?;
            items.push(ActivityWithCount {
                activity,
                current_participants,
            });
        }
        Ok(ActivityPage {
            items,
            total,
            page: page.page,
            pages: page.pages_for(total),
        })
    }
}

// ── GetActivity ──────────────────────────────────────────────────────────────

pub struct GetActivityUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> GetActivityUseCase<A, R> {
    pub async fn execute(&self, id: Uuid) -> Result<ActivityWithCount, AssociationError> {
        let activity = self
            .activities
            .find_by_id(id)
            .await?
            .ok_or(AssociationError::ActivityNotFound)?;
        let current_participants = self
            .registrations
            .count_live_for_activity(activity.id)
            .await?;
        Ok(ActivityWithCount {
            activity,
            current_participants,
        })
    }
}

// ── CreateActivity (admin) ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CreateActivityInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<i32>,
    pub image_url: Option<String>,
}

pub struct CreateActivityUseCase<A: ActivityRepository> {
    pub repo: A,
}

impl<A: ActivityRepository> CreateActivityUseCase<A> {
    pub async fn execute(
        &self,
        created_by: Uuid,
        input: CreateActivityInput,
    ) -> Result<Activity, AssociationError> {
        let title = require_text(&input.title, "title")?;
        let description = require_text(&input.description, "description")?;
        let location = require_text(&input.location, "location")?;
        let start_time = input
            .start_time
            .ok_or_else(|| AssociationError::MissingField("start_time".to_owned()))?;
        let end_time = input
            .end_time
            .ok_or_else(|| AssociationError::MissingField("end_time".to_owned()))?;
        let registration_deadline = input.registration_deadline.ok_or_else(|| {
            AssociationError::MissingField("registration_deadline".to_owned())
        })?;

        if !dates_ordered(start_time, end_time, registration_deadline) {
            return Err(AssociationError::InvalidDateOrder);
        }

        let now = Utc::now();
        let activity = Activity {
            id: Uuid::now_v7(),
            title,
            description,
            location,
            start_time,
            end_time,
            registration_deadline,
            max_participants: input.max_participants,
            status: ActivityStatus::Active,
            image_url: input.image_url.filter(|v| !v.trim().is_empty()),
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&activity).await?;
        Ok(activity)
    }
}

fn require_text(value: &Option<String>, name: &str) -> Result<String, AssociationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(AssociationError::MissingField(name.to_owned())),
    }
}

// ── UpdateActivity (admin) ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateActivityInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<Option<i32>>,
    pub image_url: Option<String>,
}

pub struct UpdateActivityUseCase<A: ActivityRepository> {
    pub repo: A,
}

impl<A: ActivityRepository> UpdateActivityUseCase<A> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateActivityInput,
    ) -> Result<Activity, AssociationError> {
        let mut activity = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AssociationError::ActivityNotFound)?;

        if let Some(title) = input.title.map(|v| v.trim().to_owned()) {
            if title.is_empty() {
                return Err(AssociationError::MissingField("title".to_owned()));
            }
            activity.title = title;
        }
        if let Some(description) = input.description {
            activity.description = description;
        }
        if let Some(location) = input.location {
            activity.location = location;
        }
        if let Some(start_time) = input.start_time {
            activity.start_time = start_time;
        }
        if let Some(end_time) = input.end_time {
            activity.end_time = end_time;
        }
        if let Some(deadline) = input.registration_deadline {
            activity.registration_deadline = deadline;
        }
        if let Some(max) = input.max_participants {
            activity.max_participants = max;
        }
        if let Some(image_url) = input.image_url {
            activity.image_url = Some(image_url).filter(|v| !v.trim().is_empty());
        }

        if !dates_ordered(
            activity.start_time,
            activity.end_time,
            activity.registration_deadline,
        ) {
            return Err(AssociationError::InvalidDateOrder);
        }

        activity.updated_at = Utc::now();
        self.repo.update(&activity).await?;
        Ok(activity)
    }
}

// ── DeleteActivity (admin) ───────────────────────────────────────────────────

pub struct DeleteActivityUseCase<A: ActivityRepository> {
    pub repo: A,
}

impl<A: ActivityRepository> DeleteActivityUseCase<A> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AssociationError> {
        if !self.repo.delete(id).await? {
            return Err(AssociationError::ActivityNotFound);
        }
        Ok(())
    }
}

// ── UpdateActivityStatus (admin) ─────────────────────────────────────────────

pub struct UpdateActivityStatusUseCase<A: ActivityRepository> {
    pub repo: A,
}

impl<A: ActivityRepository> UpdateActivityStatusUseCase<A> {
    pub async fn execute(&self, id: Uuid, status: &str) -> Result<(), AssociationError> {
        let status =
            ActivityStatus::from_str_opt(status).ok_or(AssociationError::InvalidStatus)?;
        self.repo.update_status(id, status).await
    }
}

// ── ListParticipants (admin) ─────────────────────────────────────────────────

pub struct ListParticipantsUseCase<A: ActivityRepository, R: RegistrationRepository> {
    pub activities: A,
    pub registrations: R,
}

impl<A: ActivityRepository, R: RegistrationRepository> ListParticipantsUseCase<A, R> {
    pub async fn execute(
        &self,
        activity_id: Uuid,
    ) -> Result<(Activity, Vec<(Registration, User)>), AssociationError> {
        let activity = self
            .activities
            .find_by_id(activity_id)
            .await?
            .ok_or(AssociationError::ActivityNotFound)?;
        let participants = self.registrations.list_participants(activity_id).await?;
        Ok((activity, participants))
    }
}
