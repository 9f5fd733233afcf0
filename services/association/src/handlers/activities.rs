use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use assoc_domain::pagination::PageRequest;

use crate::error::AssociationError;
use crate::handlers::dto::{ActivityDto, MessageResponse, RegistrationDto, UserDto};
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::activity::{
    CreateActivityInput, CreateActivityUseCase, DeleteActivityUseCase, GetActivityUseCase,
    ListActivitiesUseCase, ListParticipantsUseCase, UpdateActivityInput, UpdateActivityStatusUseCase,
    UpdateActivityUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ActivityResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub activity: ActivityDto,
}

#[derive(Serialize)]
pub struct ActivityListResponse {
    pub success: bool,
    pub activities: Vec<ActivityDto>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

#[derive(Serialize)]
pub struct ParticipantDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub registration: RegistrationDto,
}

#[derive(Serialize)]
pub struct ParticipantListResponse {
    pub success: bool,
    pub activity: ActivityDto,
    pub participants: Vec<ParticipantDto>,
}

// ── GET /api/activities ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ActivityListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<ActivityListResponse>, AssociationError> {
    let uc = ListActivitiesUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(10),
        page: query.page.unwrap_or(1),
    };
    let result = uc.execute(query.status.as_deref(), page).await?;
    Ok(Json(ActivityListResponse {
        success: true,
        activities: result.items.into_iter().map(ActivityDto::from).collect(),
        total: result.total,
        page: result.page,
        pages: result.pages,
    }))
}

// ── GET /api/activities/{id} ─────────────────────────────────────────────────

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityResponse>, AssociationError> {
    let uc = GetActivityUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let counted = uc.execute(id).await?;
    Ok(Json(ActivityResponse {
        success: true,
        message: None,
        activity: counted.into(),
    }))
}

// ── POST /api/activities ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<i32>,
    pub image_url: Option<String>,
}

pub async fn create_activity(
    session: Session,
    State(state): State<AppState>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ActivityResponse>), AssociationError> {
    session.require_admin()?;
    let uc = CreateActivityUseCase {
        repo: state.activity_repo(),
    };
    let activity = uc
        .execute(
            session.0.user_id,
            CreateActivityInput {
                title: req.title,
                description: req.description,
                location: req.location,
                start_time: req.start_time,
                end_time: req.end_time,
                registration_deadline: req.registration_deadline,
                max_participants: req.max_participants,
                image_url: req.image_url,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse {
            success: true,
            message: Some("活动创建成功".to_owned()),
            activity: activity.into(),
        }),
    ))
}

// ── PUT /api/activities/{id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    // `"max_participants": null` clears the capacity; absence leaves it alone.
    #[serde(default, deserialize_with = "double_option")]
    pub max_participants: Option<Option<i32>>,
    pub image_url: Option<String>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::<i32>::deserialize(deserializer)?))
}

pub async fn update_activity(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateActivityRequest>,
) -> Result<Json<ActivityResponse>, AssociationError> {
    session.require_admin()?;
    let uc = UpdateActivityUseCase {
        repo: state.activity_repo(),
    };
    let activity = uc
        .execute(
            id,
            UpdateActivityInput {
                title: req.title,
                description: req.description,
                location: req.location,
                start_time: req.start_time,
                end_time: req.end_time,
                registration_deadline: req.registration_deadline,
                max_participants: req.max_participants,
                image_url: req.image_url,
            },
        )
        .await?;
    Ok(Json(ActivityResponse {
        success: true,
        message: Some("活动更新成功".to_owned()),
        activity: activity.into(),
    }))
}

// ── DELETE /api/activities/{id} ──────────────────────────────────────────────

pub async fn delete_activity(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AssociationError> {
    session.require_admin()?;
    let uc = DeleteActivityUseCase {
        repo: state.activity_repo(),
    };
    uc.execute(id).await?;
    Ok(Json(MessageResponse::ok("活动删除成功")))
}

// ── PUT /api/activities/{id}/status ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn update_activity_status(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, AssociationError> {
    session.require_admin()?;
    let status = req
        .status
        .ok_or_else(|| AssociationError::MissingField("status".to_owned()))?;
    let uc = UpdateActivityStatusUseCase {
        repo: state.activity_repo(),
    };
    uc.execute(id, &status).await?;
    Ok(Json(MessageResponse::ok("活动状态更新成功")))
}

// ── GET /api/activities/{id}/participants ────────────────────────────────────

pub async fn list_participants(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantListResponse>, AssociationError> {
    session.require_admin()?;
    let uc = ListParticipantsUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let (activity, participants) = uc.execute(id).await?;
    Ok(Json(ParticipantListResponse {
        success: true,
        activity: activity.into(),
        participants: participants
            .into_iter()
            .map(|(registration, user)| ParticipantDto {
                user: user.into(),
                registration: registration.into(),
            })
            .collect(),
    }))
}
