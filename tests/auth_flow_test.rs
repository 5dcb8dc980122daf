use apexskill_backend::auth;
use apexskill_backend::db::{AdminStore, schema};
use sqlx::sqlite::SqlitePoolOptions;

// A single connection keeps every query on the same in-memory database.
async fn admin_store() -> AdminStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    schema::bootstrap(&pool)
        .await
        .expect("Failed to bootstrap schema");
    AdminStore::new(pool)
}

#[tokio::test]
async fn test_successful_login_touches_last_login() {
    let admins = admin_store().await;
    auth::ensure_admin(&admins, "admin", "secret123")
        .await
        .expect("Provisioning should succeed");

    let before = admins
        .find_by_username("admin")
        .await
        .unwrap()
        .expect("Admin should exist");
    assert!(before.last_login.is_none());

    let user = auth::authenticate(&admins, "admin", "secret123")
        .await
        .expect("Login should succeed");
    assert_eq!(user.username, "admin");

    let after = admins
        .find_by_username("admin")
        .await
        .unwrap()
        .expect("Admin should exist");
    assert!(after.last_login.is_some());
}

#[tokio::test]
async fn test_failed_login_leaves_last_login_unset() {
    let admins = admin_store().await;
    auth::ensure_admin(&admins, "admin", "secret123")
        .await
        .expect("Provisioning should succeed");

    let result = auth::authenticate(&admins, "admin", "wrong-password").await;
    assert!(result.is_err());

    let result = auth::authenticate(&admins, "nobody", "secret123").await;
    assert!(result.is_err());

    let user = admins
        .find_by_username("admin")
        .await
        .unwrap()
        .expect("Admin should exist");
    assert!(user.last_login.is_none());
}

#[tokio::test]
async fn test_ensure_admin_never_overwrites() {
    let admins = admin_store().await;
    auth::ensure_admin(&admins, "admin", "first-password")
        .await
        .expect("Provisioning should succeed");
    auth::ensure_admin(&admins, "admin", "second-password")
        .await
        .expect("Repeat provisioning should succeed");

    // The original credentials still win.
    assert!(auth::authenticate(&admins, "admin", "first-password").await.is_ok());
    assert!(auth::authenticate(&admins, "admin", "second-password").await.is_err());
}
