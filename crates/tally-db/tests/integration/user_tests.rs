use rust_decimal::Decimal;
use tally_core::models::{NewUser, UserUpdate};
use tally_db::UserRepository;

use crate::integration::common::setup_test_db;

fn new_user(email: &str, admin: bool) -> NewUser {
    NewUser {
        fullname: "Test Person".into(),
        email: email.into(),
        salary: Decimal::new(180000, 2),
        admin,
        active: true,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    }
}

#[tokio::test]
async fn create_and_find_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_user("ana@example.com", false)).await.unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.email, "ana@example.com");
    assert_eq!(created.salary, Decimal::new(180000, 2));
    assert!(created.active);
    assert!(created.resignation_date.is_none());

    let found = repo
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .expect("Should find the user");
    assert_eq!(found.id, created.id);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "ana@example.com");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_user("dup@example.com", false)).await.unwrap();
    let err = repo.create(&new_user("dup@example.com", true)).await.unwrap_err();
    assert!(matches!(err, tally_core::AppError::Conflict(_)));
}

#[tokio::test]
async fn list_orders_by_fullname() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let mut zed = new_user("zed@example.com", false);
    zed.fullname = "Zed".into();
    let mut amy = new_user("amy@example.com", false);
    amy.fullname = "Amy".into();

    repo.create(&zed).await.unwrap();
    repo.create(&amy).await.unwrap();

    let users = repo.list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].fullname, "Amy");
    assert_eq!(users[1].fullname, "Zed");
}

#[tokio::test]
async fn update_without_password_keeps_hash() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_user("ana@example.com", false)).await.unwrap();

    let updated = repo
        .update(
            "ana@example.com",
            &UserUpdate {
                fullname: "Ana Souza".into(),
                email: "ana@example.com".into(),
                salary: Decimal::new(210000, 2),
                admin: true,
                password_hash: None,
            },
        )
        .await
        .unwrap()
        .expect("Should update");

    assert_eq!(updated.fullname, "Ana Souza");
    assert_eq!(updated.salary, Decimal::new(210000, 2));
    assert!(updated.admin);
    assert_eq!(updated.password_hash, created.password_hash);
    // hiring_date is immutable
    assert_eq!(updated.hiring_date, created.hiring_date);
}

#[tokio::test]
async fn update_with_password_replaces_hash() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_user("ana@example.com", false)).await.unwrap();

    let updated = repo
        .update(
            "ana@example.com",
            &UserUpdate {
                fullname: "Ana".into(),
                email: "ana@example.com".into(),
                salary: Decimal::new(180000, 2),
                admin: false,
                password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$bmV3$bmV3aGFzaA".into()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_ne!(updated.password_hash, created.password_hash);
}

#[tokio::test]
async fn update_unknown_user_returns_none() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let result = repo
        .update(
            "ghost@example.com",
            &UserUpdate {
                fullname: "Ghost".into(),
                email: "ghost@example.com".into(),
                salary: Decimal::ONE,
                admin: false,
                password_hash: None,
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn deactivate_and_reactivate() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_user("ana@example.com", false)).await.unwrap();

    let deactivated = repo
        .set_active("ana@example.com", false, Some(chrono::Utc::now()))
        .await
        .unwrap()
        .expect("Should update");
    assert!(!deactivated.active);
    assert!(deactivated.resignation_date.is_some());

    let reactivated = repo
        .set_active("ana@example.com", true, None)
        .await
        .unwrap()
        .unwrap();
    assert!(reactivated.active);
    assert!(reactivated.resignation_date.is_none());
}

#[tokio::test]
async fn update_password_reports_missing_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_user("ana@example.com", false)).await.unwrap();

    assert!(
        repo.update_password("ana@example.com", "$argon2id$v=19$m=19456,t=2,p=1$eA$eQ")
            .await
            .unwrap()
    );
    assert!(!repo.update_password("ghost@example.com", "$argon2id$x").await.unwrap());
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let first = repo
        .ensure_admin("Administrator", "admin@example.com", "$argon2id$v=19$m=19456,t=2,p=1$YQ$Yg")
        .await
        .unwrap();
    assert!(first);

    let second = repo
        .ensure_admin("Administrator", "admin@example.com", "$argon2id$v=19$m=19456,t=2,p=1$YQ$Yg")
        .await
        .unwrap();
    assert!(!second);

    let admin = repo.find_by_email("admin@example.com").await.unwrap().unwrap();
    assert!(admin.admin);
    assert!(admin.active);
}
