use chrono::Utc;
use uuid::Uuid;

use assoc_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{ProfileChanges, User};
use crate::error::AssociationError;
use crate::password::{hash_password, verify_password};

fn require_field<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, AssociationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AssociationError::MissingField(name.to_owned())),
    }
}

fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RegisterUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, AssociationError> {
        let username = require_field(&input.username, "username")?.to_owned();
        let email = require_field(&input.email, "email")?.to_owned();
        let password = require_field(&input.password, "password")?.to_owned();
        let full_name = require_field(&input.full_name, "full_name")?.to_owned();

        if self.repo.find_by_username(&username).await?.is_some() {
            return Err(AssociationError::UsernameTaken);
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AssociationError::EmailTaken);
        }

        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash: hash_password(&password)?,
            full_name,
            role: UserRole::Student,
            student_id: normalize_opt(input.student_id),
            phone: normalize_opt(input.phone),
            department: normalize_opt(input.department),
            major: normalize_opt(input.major),
            created_at: Utc::now(),
            last_login: None,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AssociationError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AssociationError::EmptyCredentials);
        }
        let Some(mut user) = self.repo.find_by_username(username.trim()).await? else {
            return Err(AssociationError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            return Err(AssociationError::InvalidCredentials);
        }
        let now = Utc::now();
        self.repo.update_last_login(user.id, now).await?;
        user.last_login = Some(now);
        Ok(user)
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, AssociationError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AssociationError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    pub password: Option<String>,
}

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, AssociationError> {
        let changes = ProfileChanges {
            full_name: normalize_opt(input.full_name),
            phone: normalize_opt(input.phone),
            department: normalize_opt(input.department),
            major: normalize_opt(input.major),
            password_hash: match normalize_opt(input.password) {
                Some(password) => Some(hash_password(&password)?),
                None => None,
            },
        };
        if changes.is_empty() {
            return self
                .repo
                .find_by_id(user_id)
                .await?
                .ok_or(AssociationError::UserNotFound);
        }
        self.repo.update_profile(user_id, &changes).await
    }
}

// ── ListUsers / GetUser (admin) ──────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        role: Option<UserRole>,
    ) -> Result<Vec<User>, AssociationError> {
        self.repo.list(role).await
    }
}

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, AssociationError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AssociationError::UserNotFound)
    }
}

// ── UpdateUserRole (admin) ───────────────────────────────────────────────────

pub struct UpdateUserRoleUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserRoleUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, role: &str) -> Result<User, AssociationError> {
        let role = UserRole::from_str_opt(role).ok_or(AssociationError::InvalidRole)?;
        self.repo.update_role(user_id, role).await
    }
}

// ── EnsureDefaultAdmin (startup bootstrap) ───────────────────────────────────

pub struct EnsureDefaultAdminUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> EnsureDefaultAdminUseCase<R> {
    pub async fn execute(&self, password: &str, email: &str) -> Result<(), AssociationError> {
        if self.repo.find_by_username("admin").await?.is_some() {
            return Ok(());
        }
        let admin = User {
            id: Uuid::now_v7(),
            username: "admin".to_owned(),
            email: email.to_owned(),
            password_hash: hash_password(password)?,
            full_name: "系统管理员".to_owned(),
            role: UserRole::Admin,
            student_id: None,
            phone: None,
            department: None,
            major: None,
            created_at: Utc::now(),
            last_login: None,
        };
        self.repo.create(&admin).await?;
        tracing::info!(username = "admin", "created default admin account");
        Ok(())
    }
}
