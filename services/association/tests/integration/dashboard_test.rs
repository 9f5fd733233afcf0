use chrono::Duration;
use uuid::Uuid;

use assoc_domain::activity::ActivityStatus;
use assoc_domain::registration::RegistrationStatus;

use association::error::AssociationError;
use association::usecase::dashboard::{
    ActivitiesWithStatsUseCase, BulkUpdateRegistrationStatusUseCase, DashboardStatsUseCase,
    ExportParticipantsUseCase, UsersWithStatsUseCase,
};

use crate::helpers::{
    MockActivityRepo, MockRegistrationRepo, MockUserRepo, live_registration, open_activity,
    test_admin, test_user,
};

#[tokio::test]
async fn should_aggregate_dashboard_counts() {
    let users = MockUserRepo::new(vec![test_admin(), test_user("a"), test_user("b")]);
    let mut completed = open_activity(None);
    completed.status = ActivityStatus::Completed;
    let activities = MockActivityRepo::new(vec![open_activity(None), completed]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    let mut cancelled = live_registration(Uuid::now_v7(), activity_id);
    cancelled.status = RegistrationStatus::Cancelled;
    registrations.seed(vec![
        live_registration(Uuid::now_v7(), activity_id),
        cancelled,
    ]);

    let stats = DashboardStatsUseCase {
        users,
        activities,
        registrations,
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.admin_users, 1);
    assert_eq!(stats.student_users, 2);
    assert_eq!(stats.total_activities, 2);
    assert_eq!(stats.active_activities, 1);
    assert_eq!(stats.completed_activities, 1);
    assert_eq!(stats.total_registrations, 2);
    assert_eq!(stats.active_registrations, 1);
    assert_eq!(stats.cancelled_registrations, 1);
    assert_eq!(stats.recent_activities.len(), 2);
    assert_eq!(stats.upcoming_activities.len(), 1);
}

#[tokio::test]
async fn should_limit_upcoming_to_five_soonest_active() {
    let users = MockUserRepo::empty();
    let mut seeded = vec![];
    for i in 1..=8 {
        let mut a = open_activity(None);
        a.start_time = a.created_at + Duration::days(i);
        seeded.push(a);
    }
    let activities = MockActivityRepo::new(seeded);
    let registrations = MockRegistrationRepo::linked(&users, &activities);

    let stats = DashboardStatsUseCase {
        users,
        activities,
        registrations,
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(stats.upcoming_activities.len(), 5);
    for pair in stats.upcoming_activities.windows(2) {
        assert!(pair[0].start_time <= pair[1].start_time);
    }
}

#[tokio::test]
async fn should_annotate_activities_with_registration_counts() {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    let mut attended = live_registration(Uuid::now_v7(), activity_id);
    attended.status = RegistrationStatus::Attended;
    registrations.seed(vec![
        live_registration(Uuid::now_v7(), activity_id),
        attended,
    ]);

    let stats = ActivitiesWithStatsUseCase {
        activities,
        registrations,
    }
    .execute(None)
    .await
    .unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_registrations, 2);
    assert_eq!(stats[0].active_registrations, 1);
}

#[tokio::test]
async fn should_annotate_users_and_reject_bad_role_filter() {
    let user = test_user("zhangsan");
    let users = MockUserRepo::new(vec![user.clone()]);
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    registrations.seed(vec![live_registration(user.id, activity_id)]);

    let uc = UsersWithStatsUseCase {
        users,
        registrations,
    };
    let stats = uc.execute(Some("student")).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_registrations, 1);

    let err = uc.execute(Some("wizard")).await.unwrap_err();
    assert!(matches!(err, AssociationError::InvalidRole));
}

#[tokio::test]
async fn should_export_participants_csv_with_quoting() {
    let mut user = test_user("zhangsan");
    user.department = Some("计算机,软件学院".to_owned());
    user.major = Some("智能\"实验班\"".to_owned());
    let users = MockUserRepo::new(vec![user.clone()]);
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    registrations.seed(vec![live_registration(user.id, activity_id)]);

    let csv = ExportParticipantsUseCase {
        activities,
        registrations,
    }
    .execute(activity_id)
    .await
    .unwrap();

    let mut lines = csv.content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "序号,用户名,姓名,学号,院系,专业,电话,邮箱,报名时间,状态,备注"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,zhangsan,张三,20250001,"));
    assert!(row.contains("\"计算机,软件学院\""));
    assert!(row.contains("\"智能\"\"实验班\"\"\""));
    assert!(row.contains(",registered,"));
    assert!(csv.filename.starts_with("participants_"));
    assert!(csv.filename.ends_with(".csv"));
}

#[tokio::test]
async fn should_export_404_for_missing_activity() {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::empty();
    let registrations = MockRegistrationRepo::linked(&users, &activities);

    let err = ExportParticipantsUseCase {
        activities,
        registrations,
    }
    .execute(Uuid::now_v7())
    .await
    .unwrap_err();
    assert!(matches!(err, AssociationError::ActivityNotFound));
}

#[tokio::test]
async fn should_bulk_update_and_skip_missing_ids() {
    let users = MockUserRepo::empty();
    let activities = MockActivityRepo::new(vec![open_activity(None)]);
    let activity_id = activities.activities.lock().unwrap()[0].id;
    let registrations = MockRegistrationRepo::linked(&users, &activities);
    let first = live_registration(Uuid::now_v7(), activity_id);
    let second = live_registration(Uuid::now_v7(), activity_id);
    let ids = vec![first.id, second.id, Uuid::now_v7()];
    registrations.seed(vec![first, second]);

    let uc = BulkUpdateRegistrationStatusUseCase {
        repo: registrations.clone(),
    };
    let updated = uc.execute(&ids, "attended").await.unwrap();
    assert_eq!(updated, 2);

    let err = uc.execute(&ids, "vanished").await.unwrap_err();
    assert!(matches!(err, AssociationError::InvalidStatus));

    let updated = uc.execute(&[], "attended").await.unwrap();
    assert_eq!(updated, 0);
}
