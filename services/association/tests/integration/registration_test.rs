use chrono::{Duration, Utc};
use uuid::Uuid;

use assoc_domain::registration::RegistrationStatus;

use association::error::AssociationError;
use association::usecase::registration::{
    CancelRegistrationUseCase, CheckRegistrationStatusUseCase, ListMyRegistrationsUseCase,
    RegisterForActivityUseCase,
};

use crate::helpers::{
    MockActivityRepo, MockRegistrationRepo, MockUserRepo, live_registration, open_activity,
};

struct Setup {
    activities: MockActivityRepo,
    registrations: MockRegistrationRepo,
    activity_id: Uuid,
}

fn setup(max: Option<i32>) -> Setup {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::new(vec![open_activity(max)]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    Setup {
        activities,
        registrations,
        activity_id,
    }
}

#[tokio::test]
async fn should_fill_activity_then_reject_with_exact_message() {
    let s = setup(Some(2));
    let register = RegisterForActivityUseCase {
        activities: s.activities,
        registrations: s.registrations,
    };

    register
        .execute(Uuid::now_v7(), s.activity_id, None)
        .await
        .unwrap();
    register
        .execute(Uuid::now_v7(), s.activity_id, None)
        .await
        .unwrap();

    let err = register
        .execute(Uuid::now_v7(), s.activity_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AssociationError::ActivityFull));
    assert_eq!(err.to_string(), "活动名额已满");
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_duplicate_registration_with_exact_message() {
    let s = setup(Some(10));
    let user_id = Uuid::now_v7();
    let register = RegisterForActivityUseCase {
        activities: s.activities,
        registrations: s.registrations,
    };

    register.execute(user_id, s.activity_id, None).await.unwrap();
    let err = register
        .execute(user_id, s.activity_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AssociationError::AlreadyRegistered));
    assert_eq!(err.to_string(), "您已报名此活动");
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_keep_at_most_one_live_registration_per_user() {
    let s = setup(None);
    let user_id = Uuid::now_v7();
    let register = RegisterForActivityUseCase {
        activities: s.activities.clone(),
        registrations: s.registrations.clone(),
    };
    let cancel = CancelRegistrationUseCase {
        activities: s.activities,
        registrations: s.registrations.clone(),
    };

    register.execute(user_id, s.activity_id, None).await.unwrap();
    cancel.execute(user_id, s.activity_id).await.unwrap();
    register.execute(user_id, s.activity_id, None).await.unwrap();

    let all = s.registrations.registrations.lock().unwrap();
    let live = all
        .iter()
        .filter(|r| r.user_id == user_id && r.status != RegistrationStatus::Cancelled)
        .count();
    assert_eq!(all.len(), 2);
    assert_eq!(live, 1);
}

#[tokio::test]
async fn should_reject_registration_when_deadline_passed() {
    let s = setup(None);
    s.activities.activities.lock().unwrap()[0].registration_deadline =
        Utc::now() - Duration::hours(1);
    let register = RegisterForActivityUseCase {
        activities: s.activities,
        registrations: s.registrations,
    };

    let err = register
        .execute(Uuid::now_v7(), s.activity_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AssociationError::RegistrationClosed));
}

#[tokio::test]
async fn should_reject_cancel_after_activity_started() {
    let s = setup(None);
    let user_id = Uuid::now_v7();
    let register = RegisterForActivityUseCase {
        activities: s.activities.clone(),
        registrations: s.registrations.clone(),
    };
    register.execute(user_id, s.activity_id, None).await.unwrap();

    s.activities.activities.lock().unwrap()[0].start_time = Utc::now() - Duration::minutes(5);
    let cancel = CancelRegistrationUseCase {
        activities: s.activities,
        registrations: s.registrations,
    };
    let err = cancel.execute(user_id, s.activity_id).await.unwrap_err();
    assert!(matches!(err, AssociationError::ActivityStarted));
}

#[tokio::test]
async fn should_reject_cancel_without_live_registration() {
    let s = setup(None);
    let cancel = CancelRegistrationUseCase {
        activities: s.activities,
        registrations: s.registrations,
    };
    let err = cancel
        .execute(Uuid::now_v7(), s.activity_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AssociationError::RegistrationNotFound));
    assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_list_own_registrations_newest_first() {
    let s = setup(None);
    let user_id = Uuid::now_v7();
    let register = RegisterForActivityUseCase {
        activities: s.activities.clone(),
        registrations: s.registrations.clone(),
    };
    register
        .execute(user_id, s.activity_id, Some("带上学生证".to_owned()))
        .await
        .unwrap();

    let second = open_activity(None);
    let second_id = second.id;
    s.activities.activities.lock().unwrap().push(second);
    register.execute(user_id, second_id, None).await.unwrap();

    let list = ListMyRegistrationsUseCase {
        repo: s.registrations,
    };
    let mine = list.execute(user_id, Some("all")).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine[0].0.registration_time >= mine[1].0.registration_time);
}

#[tokio::test]
async fn should_report_registration_status() {
    let s = setup(None);
    let user_id = Uuid::now_v7();
    let check = CheckRegistrationStatusUseCase {
        repo: s.registrations.clone(),
    };
    assert!(check.execute(user_id, s.activity_id).await.unwrap().is_none());

    let register = RegisterForActivityUseCase {
        activities: s.activities,
        registrations: s.registrations,
    };
    register.execute(user_id, s.activity_id, None).await.unwrap();

    let status = check.execute(user_id, s.activity_id).await.unwrap().unwrap();
    assert_eq!(status.status, RegistrationStatus::Registered);
}

#[tokio::test]
async fn should_report_cancelled_registration_in_status() {
    let s = setup(None);
    let user_id = Uuid::now_v7();
    let mut reg = live_registration(user_id, s.activity_id);
    reg.status = RegistrationStatus::Cancelled;
    s.registrations.seed(vec![reg]);

    let check = CheckRegistrationStatusUseCase {
        repo: s.registrations,
    };
    let status = check.execute(user_id, s.activity_id).await.unwrap().unwrap();
    assert_eq!(status.status, RegistrationStatus::Cancelled);
}
