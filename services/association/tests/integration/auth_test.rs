use assoc_domain::user::UserRole;

use association::error::AssociationError;
use association::password::verify_password;
use association::usecase::auth::{
    EnsureDefaultAdminUseCase, LoginUseCase, RegisterUserInput, RegisterUserUseCase,
    UpdateProfileInput, UpdateProfileUseCase, UpdateUserRoleUseCase,
};

use crate::helpers::{MockUserRepo, TEST_PASSWORD, test_user};

fn register_input(username: &str) -> RegisterUserInput {
    RegisterUserInput {
        username: Some(username.to_owned()),
        email: Some(format!("{username}@example.com")),
        password: Some(TEST_PASSWORD.to_owned()),
        full_name: Some("李四".to_owned()),
        student_id: Some("20250002".to_owned()),
        ..Default::default()
    }
}

#[tokio::test]
async fn should_register_then_login() {
    let repo = MockUserRepo::empty();
    let registered = RegisterUserUseCase { repo: repo.clone() }
        .execute(register_input("lisi"))
        .await
        .unwrap();
    assert_eq!(registered.role, UserRole::Student);

    let login = LoginUseCase { repo };
    let logged_in = login.execute("lisi", TEST_PASSWORD).await.unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert!(logged_in.last_login.is_some());
}

#[tokio::test]
async fn should_refresh_last_login_on_each_login() {
    let repo = MockUserRepo::new(vec![test_user("lisi")]);
    let login = LoginUseCase { repo };

    let first = login.execute("lisi", TEST_PASSWORD).await.unwrap();
    let second = login.execute("lisi", TEST_PASSWORD).await.unwrap();
    assert!(second.last_login.unwrap() >= first.last_login.unwrap());
}

#[tokio::test]
async fn should_reject_wrong_password_with_401_error() {
    let repo = MockUserRepo::new(vec![test_user("lisi")]);
    let login = LoginUseCase { repo };

    let err = login.execute("lisi", "wrong-password").await.unwrap_err();
    assert!(matches!(err, AssociationError::InvalidCredentials));
    assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_duplicate_username_and_email() {
    let repo = MockUserRepo::empty();
    let register = RegisterUserUseCase { repo };
    register.execute(register_input("lisi")).await.unwrap();

    let err = register.execute(register_input("lisi")).await.unwrap_err();
    assert!(matches!(err, AssociationError::UsernameTaken));

    let mut input = register_input("wangwu");
    input.email = Some("lisi@example.com".to_owned());
    let err = register.execute(input).await.unwrap_err();
    assert!(matches!(err, AssociationError::EmailTaken));
}

#[tokio::test]
async fn should_change_password_through_profile_update() {
    let user = test_user("lisi");
    let id = user.id;
    let repo = MockUserRepo::new(vec![user]);

    let updated = UpdateProfileUseCase { repo: repo.clone() }
        .execute(
            id,
            UpdateProfileInput {
                password: Some("brand-new-pw".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(verify_password("brand-new-pw", &updated.password_hash));

    let login = LoginUseCase { repo };
    assert!(login.execute("lisi", TEST_PASSWORD).await.is_err());
    assert!(login.execute("lisi", "brand-new-pw").await.is_ok());
}

#[tokio::test]
async fn should_update_role_and_reject_unknown_role() {
    let user = test_user("lisi");
    let id = user.id;
    let repo = MockUserRepo::new(vec![user]);
    let uc = UpdateUserRoleUseCase { repo };

    let promoted = uc.execute(id, "admin").await.unwrap();
    assert_eq!(promoted.role, UserRole::Admin);

    let err = uc.execute(id, "moderator").await.unwrap_err();
    assert!(matches!(err, AssociationError::InvalidRole));
}

#[tokio::test]
async fn should_bootstrap_default_admin_exactly_once() {
    let repo = MockUserRepo::empty();
    let uc = EnsureDefaultAdminUseCase { repo: repo.clone() };

    uc.execute("admin123", "admin@example.com").await.unwrap();
    uc.execute("admin123", "admin@example.com").await.unwrap();

    let admins = repo.users.lock().unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].username, "admin");
    assert_eq!(admins[0].role, UserRole::Admin);
    assert!(verify_password("admin123", &admins[0].password_hash));
}
