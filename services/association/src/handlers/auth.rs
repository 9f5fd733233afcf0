use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use assoc_domain::user::UserRole;
use assoc_session::cookie::{clear_session_cookie, set_session_cookie};
use assoc_session::token::issue_session_token;

use crate::error::AssociationError;
use crate::handlers::dto::{MessageResponse, UserDto};
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::auth::{
    GetProfileUseCase, GetUserUseCase, ListUsersUseCase, LoginUseCase, RegisterUserInput,
    RegisterUserUseCase, UpdateProfileInput, UpdateProfileUseCase, UpdateUserRoleUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserDto,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserDto>,
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AssociationError> {
    let uc = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let user = uc
        .execute(RegisterUserInput {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            student_id: req.student_id,
            phone: req.phone,
            department: req.department,
            major: req.major,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: Some("注册成功".to_owned()),
            user: user.into(),
        }),
    ))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), AssociationError> {
    let uc = LoginUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(&req.username, &req.password).await?;
    let token = issue_session_token(user.id, &user.username, user.role, &state.session_secret)
        .map_err(|e| AssociationError::Internal(anyhow::anyhow!("issue session token: {e}")))?;
    Ok((
        set_session_cookie(jar, token),
        Json(UserResponse {
            success: true,
            message: Some("登录成功".to_owned()),
            user: user.into(),
        }),
    ))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        clear_session_cookie(jar),
        Json(MessageResponse::ok("已退出登录")),
    )
}

// ── GET /api/auth/profile ────────────────────────────────────────────────────

pub async fn get_profile(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AssociationError> {
    let uc = GetProfileUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(session.0.user_id).await?;
    Ok(Json(UserResponse {
        success: true,
        message: None,
        user: user.into(),
    }))
}

// ── PUT /api/auth/profile ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    pub password: Option<String>,
}

pub async fn update_profile(
    session: Session,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AssociationError> {
    let uc = UpdateProfileUseCase {
        repo: state.user_repo(),
    };
    let user = uc
        .execute(
            session.0.user_id,
            UpdateProfileInput {
                full_name: req.full_name,
                phone: req.phone,
                department: req.department,
                major: req.major,
                password: req.password,
            },
        )
        .await?;
    Ok(Json(UserResponse {
        success: true,
        message: Some("个人信息更新成功".to_owned()),
        user: user.into(),
    }))
}

// ── GET /api/auth/users ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UserListQuery {
    pub role: Option<String>,
}

pub async fn list_users(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AssociationError> {
    session.require_admin()?;
    let role = match query.role.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(UserRole::from_str_opt(s).ok_or(AssociationError::InvalidRole)?),
    };
    let uc = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = uc.execute(role).await?;
    Ok(Json(UserListResponse {
        success: true,
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

// ── GET /api/auth/users/{id} ─────────────────────────────────────────────────

pub async fn get_user(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AssociationError> {
    session.require_admin()?;
    let uc = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(id).await?;
    Ok(Json(UserResponse {
        success: true,
        message: None,
        user: user.into(),
    }))
}

// ── PUT /api/auth/users/{id}/role ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

pub async fn update_user_role(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AssociationError> {
    session.require_admin()?;
    let role = req
        .role
        .ok_or_else(|| AssociationError::MissingField("role".to_owned()))?;
    let uc = UpdateUserRoleUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(id, &role).await?;
    Ok(Json(UserResponse {
        success: true,
        message: Some("用户角色更新成功".to_owned()),
        user: user.into(),
    }))
}
