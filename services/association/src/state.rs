use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::db::{DbActivityRepository, DbRegistrationRepository, DbUserRepository};

/// Shared application state passed to every handler via axum `State`.
///
/// The connection is behind `Arc` because `DatabaseConnection` is not
/// `Clone` when the `mock` feature is enabled, and dev builds unify it in.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub session_secret: String,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn activity_repo(&self) -> DbActivityRepository {
        DbActivityRepository {
            db: self.db.clone(),
        }
    }

    pub fn registration_repo(&self) -> DbRegistrationRepository {
        DbRegistrationRepository {
            db: self.db.clone(),
        }
    }

    /// Directory image uploads are stored in.
    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}
