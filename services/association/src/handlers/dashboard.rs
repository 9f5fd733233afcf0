use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AssociationError;
use crate::handlers::dto::{ActivityDto, UserDto};
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::dashboard::{
    ActivitiesWithStatsUseCase, BulkUpdateRegistrationStatusUseCase, DashboardStatsUseCase,
    ExportParticipantsUseCase, UsersWithStatsUseCase,
};

// ── GET /api/dashboard/stats ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub users: UserCounts,
    pub activities: ActivityCounts,
    pub registrations: RegistrationCounts,
    pub recent_activities: Vec<ActivityDto>,
    pub upcoming_activities: Vec<ActivityDto>,
}

#[derive(Serialize)]
pub struct UserCounts {
    pub total: u64,
    pub students: u64,
    pub admins: u64,
}

#[derive(Serialize)]
pub struct ActivityCounts {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Serialize)]
pub struct RegistrationCounts {
    pub total: u64,
    pub registered: u64,
    pub attended: u64,
    pub cancelled: u64,
}

pub async fn stats(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AssociationError> {
    session.require_admin()?;
    let uc = DashboardStatsUseCase {
        users: state.user_repo(),
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let stats = uc.execute().await?;
    Ok(Json(StatsResponse {
        success: true,
        users: UserCounts {
            total: stats.total_users,
            students: stats.student_users,
            admins: stats.admin_users,
        },
        activities: ActivityCounts {
            total: stats.total_activities,
            active: stats.active_activities,
            completed: stats.completed_activities,
            cancelled: stats.cancelled_activities,
        },
        registrations: RegistrationCounts {
            total: stats.total_registrations,
            registered: stats.active_registrations,
            attended: stats.attended_registrations,
            cancelled: stats.cancelled_registrations,
        },
        recent_activities: stats
            .recent_activities
            .into_iter()
            .map(ActivityDto::from)
            .collect(),
        upcoming_activities: stats
            .upcoming_activities
            .into_iter()
            .map(ActivityDto::from)
            .collect(),
    }))
}

// ── GET /api/dashboard/activities ────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct DashboardActivitiesQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ActivityStatsDto {
    #[serde(flatten)]
    pub activity: ActivityDto,
    pub total_registrations: u64,
    pub active_registrations: u64,
}

#[derive(Serialize)]
pub struct DashboardActivitiesResponse {
    pub success: bool,
    pub activities: Vec<ActivityStatsDto>,
}

pub async fn activities_with_stats(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<DashboardActivitiesQuery>,
) -> Result<Json<DashboardActivitiesResponse>, AssociationError> {
    session.require_admin()?;
    let uc = ActivitiesWithStatsUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let stats = uc.execute(query.status.as_deref()).await?;
    Ok(Json(DashboardActivitiesResponse {
        success: true,
        activities: stats
            .into_iter()
            .map(|s| ActivityStatsDto {
                activity: s.activity.into(),
                total_registrations: s.total_registrations,
                active_registrations: s.active_registrations,
            })
            .collect(),
    }))
}

// ── GET /api/dashboard/users ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct DashboardUsersQuery {
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct UserStatsDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub total_registrations: u64,
    pub active_registrations: u64,
}

#[derive(Serialize)]
pub struct DashboardUsersResponse {
    pub success: bool,
    pub users: Vec<UserStatsDto>,
}

pub async fn users_with_stats(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<DashboardUsersQuery>,
) -> Result<Json<DashboardUsersResponse>, AssociationError> {
    session.require_admin()?;
    let uc = UsersWithStatsUseCase {
        users: state.user_repo(),
        registrations: state.registration_repo(),
    };
    let stats = uc.execute(query.role.as_deref()).await?;
    Ok(Json(DashboardUsersResponse {
        success: true,
        users: stats
            .into_iter()
            .map(|s| UserStatsDto {
                user: s.user.into(),
                total_registrations: s.total_registrations,
                active_registrations: s.active_registrations,
            })
            .collect(),
    }))
}

// ── GET /api/dashboard/export/participants/{id} ──────────────────────────────

#[derive(Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub filename: String,
    pub content: String,
}

pub async fn export_participants(
    session: Session,
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AssociationError> {
    session.require_admin()?;
    let uc = ExportParticipantsUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let csv = uc.execute(activity_id).await?;
    Ok(Json(ExportResponse {
        success: true,
        filename: csv.filename,
        content: csv.content,
    }))
}

// ── POST /api/dashboard/registrations/update-status ──────────────────────────

#[derive(Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub registration_ids: Vec<Uuid>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct BulkUpdateResponse {
    pub success: bool,
    pub message: String,
    pub updated: u64,
}

pub async fn bulk_update_registration_status(
    session: Session,
    State(state): State<AppState>,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>, AssociationError> {
    session.require_admin()?;
    let status = req.status.ok_or(AssociationError::InvalidRequest)?;
    let uc = BulkUpdateRegistrationStatusUseCase {
        repo: state.registration_repo(),
    };
    let updated = uc.execute(&req.registration_ids, &status).await?;
    Ok(Json(BulkUpdateResponse {
        success: true,
        message: format!("已更新 {updated} 条报名记录"),
        updated,
    }))
}
