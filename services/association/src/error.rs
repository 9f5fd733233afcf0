use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Association service domain error variants.
///
/// Display strings are the user-facing messages returned in the JSON body;
/// they match the messages the frontend expects.
#[derive(Debug, thiserror::Error)]
pub enum AssociationError {
    #[error("缺少必填字段: {0}")]
    MissingField(String),
    #[error("用户名和密码不能为空")]
    EmptyCredentials,
    #[error("用户名或密码错误")]
    InvalidCredentials,
    #[error("请先登录")]
    LoginRequired,
    #[error("需要管理员权限")]
    AdminRequired,
    #[error("用户不存在")]
    UserNotFound,
    #[error("活动不存在")]
    ActivityNotFound,
    #[error("您未报名此活动")]
    RegistrationNotFound,
    #[error("用户名已存在")]
    UsernameTaken,
    #[error("邮箱已被注册")]
    EmailTaken,
    #[error("您已报名此活动")]
    AlreadyRegistered,
    #[error("活动名额已满")]
    ActivityFull,
    #[error("活动报名已截止或已取消")]
    RegistrationClosed,
    #[error("活动已开始，无法取消报名")]
    ActivityStarted,
    #[error("活动时间设置无效")]
    InvalidDateOrder,
    #[error("无效的角色值")]
    InvalidRole,
    #[error("无效的状态值")]
    InvalidStatus,
    #[error("无效请求")]
    InvalidRequest,
    #[error("未选择文件")]
    EmptyFile,
    #[error("不支持的文件类型")]
    UnsupportedFileType,
    #[error("服务器内部错误")]
    Internal(#[from] anyhow::Error),
}

impl AssociationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::EmptyCredentials => "EMPTY_CREDENTIALS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::LoginRequired => "LOGIN_REQUIRED",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ActivityNotFound => "ACTIVITY_NOT_FOUND",
            Self::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::ActivityFull => "ACTIVITY_FULL",
            Self::RegistrationClosed => "REGISTRATION_CLOSED",
            Self::ActivityStarted => "ACTIVITY_STARTED",
            Self::InvalidDateOrder => "INVALID_DATE_ORDER",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::EmptyFile => "EMPTY_FILE",
            Self::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_)
            | Self::EmptyCredentials
            | Self::UsernameTaken
            | Self::EmailTaken
            | Self::AlreadyRegistered
            | Self::ActivityFull
            | Self::RegistrationClosed
            | Self::ActivityStarted
            | Self::InvalidDateOrder
            | Self::InvalidRole
            | Self::InvalidStatus
            | Self::InvalidRequest
            | Self::EmptyFile
            | Self::UnsupportedFileType => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::LoginRequired => StatusCode::UNAUTHORIZED,
            Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::ActivityNotFound | Self::RegistrationNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AssociationError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only. TraceLayer already records method/uri/status for all
        // requests, and 4xx are expected client errors. Internal errors need
        // the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
