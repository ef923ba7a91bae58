//! Integration tests for `DieselUserRepository` against PostgreSQL.
//!
//! Set `USERS_TEST_DATABASE_URL` to a disposable database to run them. When
//! the variable is unset each test prints a skip marker and returns. Tests
//! share the database, so assertions only consider rows they created.

use rstest::{fixture, rstest};

use users_api::domain::ports::{UserPersistenceError, UserRepository};
use users_api::domain::{Cpf, EmailAddress, NewUser, Password, UserChanges, UserId, UserName};
use users_api::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_migrations,
};

const DATABASE_URL_VAR: &str = "USERS_TEST_DATABASE_URL";

fn test_database_url() -> Option<String> {
    match std::env::var(DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {DATABASE_URL_VAR} is not set");
            None
        }
    }
}

async fn repository(url: &str) -> DieselUserRepository {
    run_migrations(url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2))
        .await
        .expect("pool builds");
    DieselUserRepository::new(pool)
}

#[fixture]
fn new_user() -> NewUser {
    NewUser {
        name: UserName::new("Diesel Test User"),
        email: EmailAddress::new("diesel@example.com").expect("valid email"),
        cpf: Cpf::new("12345678901").expect("valid cpf"),
        password: Password::new("secret1").expect("valid password"),
    }
}

#[rstest]
#[tokio::test]
async fn created_users_round_trip_through_the_table(new_user: NewUser) {
    let Some(url) = test_database_url() else {
        return;
    };
    let repo = repository(&url).await;

    let created = repo.create(new_user.clone()).await.expect("create");
    assert_eq!(created.name(), &new_user.name);
    assert_eq!(created.cpf(), &new_user.cpf);

    let fetched = repo.find_by_id(created.id()).await.expect("find");
    assert_eq!(fetched.as_ref(), Some(&created));

    let listed = repo.find_all().await.expect("list");
    assert!(listed.iter().any(|user| user.id() == created.id()));

    repo.delete_by_id(created.id()).await.expect("cleanup");
}

#[rstest]
#[tokio::test]
async fn partial_updates_replace_only_given_fields(new_user: NewUser) {
    let Some(url) = test_database_url() else {
        return;
    };
    let repo = repository(&url).await;
    let created = repo.create(new_user).await.expect("create");

    let changes = UserChanges {
        email: Some(EmailAddress::new("changed@example.com").expect("valid email")),
        ..UserChanges::default()
    };
    let updated = repo
        .update_by_id(created.id(), changes)
        .await
        .expect("update")
        .expect("user exists");

    assert_eq!(updated.email().as_ref(), "changed@example.com");
    assert_eq!(updated.name(), created.name());

    let unchanged = repo
        .update_by_id(created.id(), UserChanges::default())
        .await
        .expect("empty update")
        .expect("user exists");
    assert_eq!(unchanged, updated);

    repo.delete_by_id(created.id()).await.expect("cleanup");
}

#[rstest]
#[tokio::test]
async fn deleting_returns_the_removed_user_once(new_user: NewUser) {
    let Some(url) = test_database_url() else {
        return;
    };
    let repo = repository(&url).await;
    let created = repo.create(new_user).await.expect("create");

    let deleted = repo.delete_by_id(created.id()).await.expect("delete");
    assert_eq!(deleted, Some(created.clone()));

    let again = repo.delete_by_id(created.id()).await.expect("second delete");
    assert!(again.is_none());
    assert!(
        repo.find_by_id(created.id())
            .await
            .expect("find")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn unknown_ids_are_absent_for_every_operation() {
    let Some(url) = test_database_url() else {
        return;
    };
    let repo = repository(&url).await;
    let id = UserId::random();

    assert!(repo.find_by_id(&id).await.expect("find").is_none());
    assert!(
        repo.update_by_id(&id, UserChanges::default())
            .await
            .expect("update")
            .is_none()
    );
    assert!(repo.delete_by_id(&id).await.expect("delete").is_none());
}

#[rstest]
#[tokio::test]
async fn unreachable_databases_surface_as_pool_errors() {
    if test_database_url().is_none() {
        return;
    }
    let result = DbPool::new(
        PoolConfig::new("postgres://nobody@127.0.0.1:1/missing")
            .with_max_size(1)
            .with_min_idle(None)
            .with_connection_timeout(std::time::Duration::from_millis(200)),
    )
    .await;

    match result {
        Err(_) => {}
        Ok(pool) => {
            let repo = DieselUserRepository::new(pool);
            let err = repo.find_all().await.expect_err("no server listens");
            assert!(matches!(err, UserPersistenceError::Connection { .. }));
        }
    }
}
