use chrono::{Duration, Utc};
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::pagination::PageRequest;

use association::error::AssociationError;
use association::usecase::activity::{
    CreateActivityInput, CreateActivityUseCase, DeleteActivityUseCase, GetActivityUseCase,
    ListActivitiesUseCase, ListParticipantsUseCase, UpdateActivityInput,
    UpdateActivityStatusUseCase, UpdateActivityUseCase,
};

use crate::helpers::{
    MockActivityRepo, MockRegistrationRepo, MockUserRepo, live_registration, open_activity,
    test_user,
};

fn create_input(title: &str) -> CreateActivityInput {
    let now = Utc::now();
    CreateActivityInput {
        title: Some(title.to_owned()),
        description: Some("活动介绍".to_owned()),
        location: Some("大礼堂".to_owned()),
        start_time: Some(now + Duration::days(7)),
        end_time: Some(now + Duration::days(7) + Duration::hours(2)),
        registration_deadline: Some(now + Duration::days(5)),
        max_participants: Some(100),
        image_url: None,
    }
}

#[tokio::test]
async fn should_create_and_fetch_activity_with_participant_count() {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::empty();
    let registrations = MockRegistrationRepo::linked(&users, &activities);

    let created = CreateActivityUseCase {
        repo: activities.clone(),
    }
    .execute(Uuid::now_v7(), create_input("合唱比赛"))
    .await
    .unwrap();

    registrations.seed(vec![
        live_registration(Uuid::now_v7(), created.id),
        live_registration(Uuid::now_v7(), created.id),
    ]);

    let fetched = GetActivityUseCase {
        activities,
        registrations,
    }
    .execute(created.id)
    .await
    .unwrap();
    assert_eq!(fetched.activity.title, "合唱比赛");
    assert_eq!(fetched.current_participants, 2);
}

#[tokio::test]
async fn should_paginate_activity_list() {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::empty();
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    let create = CreateActivityUseCase {
        repo: activities.clone(),
    };
    for i in 0..25 {
        create
            .execute(Uuid::now_v7(), create_input(&format!("活动 {i}")))
            .await
            .unwrap();
    }

    let list = ListActivitiesUseCase {
        activities,
        registrations,
    };
    let page = list
        .execute(
            Some("all"),
            PageRequest {
                per_page: 10,
                page: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.pages, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.items.len(), 5);
}

#[tokio::test]
async fn should_filter_activity_list_by_status() {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::new(vec![open_activity(None), {
        let mut cancelled = open_activity(None);
        cancelled.status = ActivityStatus::Cancelled;
        cancelled
    }]);
    let registrations = MockRegistrationRepo::linked(&users, &activities);

    let list = ListActivitiesUseCase {
        activities,
        registrations,
    };
    let page = list
        .execute(Some("active"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].activity.status, ActivityStatus::Active);
}

#[tokio::test]
async fn should_update_activity_fields_and_revalidate_dates() {
    let activities = MockActivityRepo::new(vec![open_activity(Some(30))]);
    let id = activities.activities.lock().unwrap()[0].id;
    let update = UpdateActivityUseCase {
        repo: activities.clone(),
    };

    let updated = update
        .execute(
            id,
            UpdateActivityInput {
                title: Some("更名后的活动".to_owned()),
                max_participants: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "更名后的活动");
    assert_eq!(updated.max_participants, None);

    let err = update
        .execute(
            id,
            UpdateActivityInput {
                end_time: Some(Utc::now() - Duration::days(30)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AssociationError::InvalidDateOrder));
}

#[tokio::test]
async fn should_delete_activity_once() {
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let id = activities.activities.lock().unwrap()[0].id;
    let uc = DeleteActivityUseCase {
        repo: activities,
    };

    uc.execute(id).await.unwrap();
    let err = uc.execute(id).await.unwrap_err();
    assert!(matches!(err, AssociationError::ActivityNotFound));
}

#[tokio::test]
async fn should_change_status_with_valid_value_only() {
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let id = activities.activities.lock().unwrap()[0].id;
    let uc = UpdateActivityStatusUseCase {
        repo: activities.clone(),
    };

    uc.execute(id, "completed").await.unwrap();
    assert_eq!(
        activities.activities.lock().unwrap()[0].status,
        ActivityStatus::Completed
    );

    let err = uc.execute(id, "archived").await.unwrap_err();
    assert!(matches!(err, AssociationError::InvalidStatus));
}

#[tokio::test]
async fn should_list_participants_with_user_details() {
    let user = test_user("zhangsan");
    let users = MockUserRepo::new(vec![user.clone()]);
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    registrations.seed(vec![live_registration(user.id, activity_id)]);

    let (activity, participants) = ListParticipantsUseCase {
        activities,
        registrations,
    }
    .execute(activity_id)
    .await
    .unwrap();
    assert_eq!(activity.id, activity_id);
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].1.username, "zhangsan");
}
