use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AssociationError;
use crate::handlers::dto::{ActivityDto, MessageResponse, RegistrationDto};
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::registration::{
    CancelRegistrationUseCase, CheckRegistrationStatusUseCase, ListMyRegistrationsUseCase,
    RegisterForActivityUseCase,
};

// ── POST /api/registration/activities/{id}/register ──────────────────────────

#[derive(Deserialize, Default)]
pub struct RegisterForActivityRequest {
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub registration: RegistrationDto,
}

pub async fn register_for_activity(
    session: Session,
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
    req: Option<Json<RegisterForActivityRequest>>,
) -> Result<(StatusCode, Json<RegisterResponse>), AssociationError> {
    let notes = req.and_then(|Json(r)| r.notes);
    let uc = RegisterForActivityUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    let registration = uc.execute(session.0.user_id, activity_id, notes).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "报名成功".to_owned(),
            registration: registration.into(),
        }),
    ))
}

// ── POST /api/registration/activities/{id}/cancel ────────────────────────────

pub async fn cancel_registration(
    session: Session,
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AssociationError> {
    let uc = CancelRegistrationUseCase {
        activities: state.activity_repo(),
        registrations: state.registration_repo(),
    };
    uc.execute(session.0.user_id, activity_id).await?;
    Ok(Json(MessageResponse::ok("已取消报名")))
}

// ── GET /api/registration/my-registrations ───────────────────────────────────

#[derive(Deserialize, Default)]
pub struct MyRegistrationsQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct MyRegistrationDto {
    #[serde(flatten)]
    pub registration: RegistrationDto,
    pub activity: ActivityDto,
}

#[derive(Serialize)]
pub struct MyRegistrationsResponse {
    pub success: bool,
    pub registrations: Vec<MyRegistrationDto>,
}

pub async fn my_registrations(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<MyRegistrationsQuery>,
) -> Result<Json<MyRegistrationsResponse>, AssociationError> {
    let uc = ListMyRegistrationsUseCase {
        repo: state.registration_repo(),
    };
    let registrations = uc
        .execute(session.0.user_id, query.status.as_deref())
        .await?;
    Ok(Json(MyRegistrationsResponse {
        success: true,
        registrations: registrations
            .into_iter()
            .map(|(registration, activity)| MyRegistrationDto {
                registration: registration.into(),
                activity: activity.into(),
            })
            .collect(),
    }))
}

// ── GET /api/registration/activities/{id}/status ─────────────────────────────

#[derive(Serialize)]
pub struct RegistrationStatusResponse {
    pub success: bool,
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationDto>,
}

pub async fn registration_status(
    session: Session,
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<RegistrationStatusResponse>, AssociationError> {
    let uc = CheckRegistrationStatusUseCase {
        repo: state.registration_repo(),
    };
    let registration = uc.execute(session.0.user_id, activity_id).await?;
    Ok(Json(RegistrationStatusResponse {
        success: true,
        registered: registration.is_some(),
        registration: registration.map(RegistrationDto::from),
    }))
}
