use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::pagination::PageRequest;
use assoc_domain::registration::RegistrationStatus;
use assoc_domain::user::UserRole;
use association_schema::{activities, registrations, users};

use crate::domain::repository::{ActivityRepository, RegistrationRepository, UserRepository};
use crate::domain::types::{Activity, ProfileChanges, Registration, User};
use crate::error::AssociationError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: Arc<DatabaseConnection>,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AssociationError> {
        let model = users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AssociationError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AssociationError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, AssociationError> {
        let mut query = users::Entity::find().order_by_desc(users::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        let models = query.all(self.db.as_ref()).await.context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &User) -> Result<(), AssociationError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            full_name: Set(user.full_name.clone()),
            role: Set(user.role.as_str().to_owned()),
            student_id: Set(user.student_id.clone()),
            phone: Set(user.phone.clone()),
            department: Set(user.department.clone()),
            major: Set(user.major.clone()),
            created_at: Set(user.created_at),
            last_login: Set(user.last_login),
        }
        .insert(self.db.as_ref())
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<User, AssociationError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref full_name) = changes.full_name {
            am.full_name = Set(full_name.clone());
        }
        if let Some(ref phone) = changes.phone {
            am.phone = Set(Some(phone.clone()));
        }
        if let Some(ref department) = changes.department {
            am.department = Set(Some(department.clone()));
        }
        if let Some(ref major) = changes.major {
            am.major = Set(Some(major.clone()));
        }
        if let Some(ref password_hash) = changes.password_hash {
            am.password_hash = Set(password_hash.clone());
        }
        let model = am.update(self.db.as_ref()).await.map_err(not_found_as_user)?;
        user_from_model(model)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<User, AssociationError> {
        let am = users::ActiveModel {
            id: Set(id),
            role: Set(role.as_str().to_owned()),
            ..Default::default()
        };
        let model = am.update(self.db.as_ref()).await.map_err(not_found_as_user)?;
        user_from_model(model)
    }

    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AssociationError> {
        users::ActiveModel {
            id: Set(id),
            last_login: Set(Some(at)),
            ..Default::default()
        }
        .update(self.db.as_ref())
        .await
        .map_err(not_found_as_user)?;
        Ok(())
    }

    async fn count(&self, role: Option<UserRole>) -> Result<u64, AssociationError> {
        let mut query = users::Entity::find();
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        Ok(query.count(self.db.as_ref()).await.context("count users")?)
    }
}

fn not_found_as_user(e: DbErr) -> AssociationError {
    match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AssociationError::UserNotFound,
        e => AssociationError::Internal(anyhow::Error::new(e).context("update user")),
    }
}

fn user_from_model(model: users::Model) -> Result<User, AssociationError> {
    let role = UserRole::from_str_opt(&model.role)
        .ok_or_else(|| anyhow!("unknown user role in database: {}", model.role))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        full_name: model.full_name,
        role,
        student_id: model.student_id,
        phone: model.phone,
        department: model.department,
        major: model.major,
        created_at: model.created_at,
        last_login: model.last_login,
    })
}

// ── Activity repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivityRepository {
    pub db: Arc<DatabaseConnection>,
}

impl ActivityRepository for DbActivityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, AssociationError> {
        let model = activities::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find activity by id")?;
        model.map(activity_from_model).transpose()
    }

    async fn list(
        &self,
        status: Option<ActivityStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Activity>, u64), AssociationError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = activities::Entity::find();
        if let Some(status) = status {
            query = query.filter(activities::Column::Status.eq(status.as_str()));
        }
        let paginator = query
            .order_by_desc(activities::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page as u64);
        let total = paginator
            .num_items()
            .await
            .context("count activities page")?;
        let models = paginator
            .fetch_page((page - 1) as u64)
            .await
            .context("fetch activities page")?;
        let items = models
            .into_iter()
            .map(activity_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn list_all(
        &self,
        status: Option<ActivityStatus>,
    ) -> Result<Vec<Activity>, AssociationError> {
        let mut query = activities::Entity::find().order_by_desc(activities::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(activities::Column::Status.eq(status.as_str()));
        }
        let models = query.all(self.db.as_ref()).await.context("list activities")?;
        models.into_iter().map(activity_from_model).collect()
    }

    async fn create(&self, activity: &Activity) -> Result<(), AssociationError> {
        activity_to_active_model(activity)
            .insert(self.db.as_ref())
            .await
            .context("create activity")?;
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> Result<(), AssociationError> {
        activity_to_active_model(activity)
            .update(self.db.as_ref())
            .await
            .map_err(not_found_as_activity)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AssociationError> {
        let res = activities::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .context("delete activity")?;
        Ok(res.rows_affected > 0)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ActivityStatus,
    ) -> Result<(), AssociationError> {
        activities::ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(self.db.as_ref())
        .await
        .map_err(not_found_as_activity)?;
        Ok(())
    }

    async fn count(&self, status: Option<ActivityStatus>) -> Result<u64, AssociationError> {
        let mut query = activities::Entity::find();
        if let Some(status) = status {
            query = query.filter(activities::Column::Status.eq(status.as_str()));
        }
        Ok(query.count(self.db.as_ref()).await.context("count activities")?)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Activity>, AssociationError> {
        let models = activities::Entity::find()
            .order_by_desc(activities::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .context("recent activities")?;
        models.into_iter().map(activity_from_model).collect()
    }

    async fn upcoming(
        &self,
        after: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Activity>, AssociationError> {
        let models = activities::Entity::find()
            .filter(activities::Column::StartTime.gt(after))
            .filter(activities::Column::Status.eq(ActivityStatus::Active.as_str()))
            .order_by_asc(activities::Column::StartTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .context("upcoming activities")?;
        models.into_iter().map(activity_from_model).collect()
    }
}

fn not_found_as_activity(e: DbErr) -> AssociationError {
    match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AssociationError::ActivityNotFound,
        e => AssociationError::Internal(anyhow::Error::new(e).context("update activity")),
    }
}

fn activity_from_model(model: activities::Model) -> Result<Activity, AssociationError> {
    let status = ActivityStatus::from_str_opt(&model.status)
        .ok_or_else(|| anyhow!("unknown activity status in database: {}", model.status))?;
    Ok(Activity {
        id: model.id,
        title: model.title,
        description: model.description,
        location: model.location,
        start_time: model.start_time,
        end_time: model.end_time,
        registration_deadline: model.registration_deadline,
        max_participants: model.max_participants,
        status,
        image_url: model.image_url,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn activity_to_active_model(activity: &Activity) -> activities::ActiveModel {
    activities::ActiveModel {
        id: Set(activity.id),
        title: Set(activity.title.clone()),
        description: Set(activity.description.clone()),
        location: Set(activity.location.clone()),
        start_time: Set(activity.start_time),
        end_time: Set(activity.end_time),
        registration_deadline: Set(activity.registration_deadline),
        max_participants: Set(activity.max_participants),
        status: Set(activity.status.as_str().to_owned()),
        image_url: Set(activity.image_url.clone()),
        created_by: Set(activity.created_by),
        created_at: Set(activity.created_at),
        updated_at: Set(activity.updated_at),
    }
}

// ── Registration repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRegistrationRepository {
    pub db: Arc<DatabaseConnection>,
}

impl RegistrationRepository for DbRegistrationRepository {
    async fn find_live(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<Option<Registration>, AssociationError> {
        let model = registrations::Entity::find()
            .filter(registrations::Column::UserId.eq(user_id))
            .filter(registrations::Column::ActivityId.eq(activity_id))
            .filter(
                registrations::Column::Status.ne(RegistrationStatus::Cancelled.as_str()),
            )
            .one(self.db.as_ref())
            .await
            .context("find live registration")?;
        model.map(registration_from_model).transpose()
    }

    async fn find_latest(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<Option<Registration>, AssociationError> {
        let model = registrations::Entity::find()
            .filter(registrations::Column::UserId.eq(user_id))
            .filter(registrations::Column::ActivityId.eq(activity_id))
            .order_by_desc(registrations::Column::RegistrationTime)
            .one(self.db.as_ref())
            .await
            .context("find latest registration")?;
        model.map(registration_from_model).transpose()
    }

    async fn register(
        &self,
        registration: &Registration,
        capacity: Option<i32>,
    ) -> Result<(), AssociationError> {
        let txn = self.db.begin().await.context("begin registration txn")?;

        if let Some(max) = capacity {
            // Lock the activity row so concurrent registrations serialize on
            // the capacity check. Without the lock, two transactions at read
            // committed could both count below the limit and both commit.
            activities::Entity::find_by_id(registration.activity_id)
                .lock_exclusive()
                .one(&txn)
                .await
                .context("lock activity row")?;

            let live = registrations::Entity::find()
                .filter(registrations::Column::ActivityId.eq(registration.activity_id))
                .filter(
                    registrations::Column::Status.ne(RegistrationStatus::Cancelled.as_str()),
                )
                .count(&txn)
                .await
                .context("count live registrations")?;
            if live >= max.max(0) as u64 {
                txn.rollback().await.context("rollback registration txn")?;
                return Err(AssociationError::ActivityFull);
            }
        }

        let insert = registrations::ActiveModel {
            id: Set(registration.id),
            user_id: Set(registration.user_id),
            activity_id: Set(registration.activity_id),
            status: Set(registration.status.as_str().to_owned()),
            registration_time: Set(registration.registration_time),
            notes: Set(registration.notes.clone()),
        }
        .insert(&txn)
        .await;

        match insert {
            Ok(_) => {
                txn.commit().await.context("commit registration txn")?;
                Ok(())
            }
            // The partial unique index on (user_id, activity_id) WHERE status
            // <> 'cancelled' rejects concurrent duplicates.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AssociationError::AlreadyRegistered)
            }
            Err(e) => Err(AssociationError::Internal(
                anyhow::Error::new(e).context("insert registration"),
            )),
        }
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<(), AssociationError> {
        registrations::ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_owned()),
            ..Default::default()
        }
        .update(self.db.as_ref())
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
                AssociationError::RegistrationNotFound
            }
            e => AssociationError::Internal(anyhow::Error::new(e).context("update registration")),
        })?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<(Registration, Activity)>, AssociationError> {
        let mut query = registrations::Entity::find()
            .filter(registrations::Column::UserId.eq(user_id))
            .order_by_desc(registrations::Column::RegistrationTime);
        if let Some(status) = status {
            query = query.filter(registrations::Column::Status.eq(status.as_str()));
        }
        let rows = query
            .find_also_related(activities::Entity)
            .all(self.db.as_ref())
            .await
            .context("list registrations for user")?;
        rows.into_iter()
            .filter_map(|(reg, act)| act.map(|act| (reg, act)))
            .map(|(reg, act)| Ok((registration_from_model(reg)?, activity_from_model(act)?)))
            .collect()
    }

    async fn list_participants(
        &self,
        activity_id: Uuid,
    ) -> Result<Vec<(Registration, User)>, AssociationError> {
        let rows = registrations::Entity::find()
            .filter(registrations::Column::ActivityId.eq(activity_id))
            .order_by_asc(registrations::Column::RegistrationTime)
            .find_also_related(users::Entity)
            .all(self.db.as_ref())
            .await
            .context("list participants")?;
        rows.into_iter()
            .filter_map(|(reg, user)| user.map(|user| (reg, user)))
            .map(|(reg, user)| Ok((registration_from_model(reg)?, user_from_model(user)?)))
            .collect()
    }

    async fn count(
        &self,
        status: Option<RegistrationStatus>,
    ) -> Result<u64, AssociationError> {
        let mut query = registrations::Entity::find();
        if let Some(status) = status {
            query = query.filter(registrations::Column::Status.eq(status.as_str()));
        }
        Ok(query.count(self.db.as_ref()).await.context("count registrations")?)
    }

    async fn count_for_activity(
        &self,
        activity_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<u64, AssociationError> {
        let mut query = registrations::Entity::find()
            .filter(registrations::Column::ActivityId.eq(activity_id));
        if let Some(status) = status {
            query = query.filter(registrations::Column::Status.eq(status.as_str()));
        }
        Ok(query
            .count(self.db.as_ref())
            .await
            .context("count registrations for activity")?)
    }

    async fn count_for_user(
        &self,
        user_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<u64, AssociationError> {
        let mut query =
            registrations::Entity::find().filter(registrations::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(registrations::Column::Status.eq(status.as_str()));
        }
        Ok(query
            .count(self.db.as_ref())
            .await
            .context("count registrations for user")?)
    }

    async fn count_live_for_activity(
        &self,
        activity_id: Uuid,
    ) -> Result<u64, AssociationError> {
        Ok(registrations::Entity::find()
            .filter(registrations::Column::ActivityId.eq(activity_id))
            .filter(registrations::Column::Status.ne(RegistrationStatus::Cancelled.as_str()))
            .count(self.db.as_ref())
            .await
            .context("count live registrations")?)
    }

    async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        status: RegistrationStatus,
    ) -> Result<u64, AssociationError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let res = registrations::Entity::update_many()
            .col_expr(
                registrations::Column::Status,
                Expr::value(status.as_str()),
            )
            .filter(registrations::Column::Id.is_in(ids.to_vec()))
            .exec(self.db.as_ref())
            .await
            .context("bulk update registration status")?;
        Ok(res.rows_affected)
    }
}

fn registration_from_model(
    model: registrations::Model,
) -> Result<Registration, AssociationError> {
    let status = RegistrationStatus::from_str_opt(&model.status)
        .ok_or_else(|| anyhow!("unknown registration status in database: {}", model.status))?;
    Ok(Registration {
        id: model.id,
        user_id: model.user_id,
        activity_id: model.activity_id,
        status,
        registration_time: model.registration_time,
        notes: model.notes,
    })
}
