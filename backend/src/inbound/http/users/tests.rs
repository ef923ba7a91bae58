//! Tests for users API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::NormalizePath;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{NewUser, UserChanges};
use crate::inbound::http::error::json_config;

const ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn ana() -> User {
    User::try_from_strings(ID, "Ana", "ana@x.com", "12345678901", "secret1")
        .expect("fixture user is valid")
}

fn valid_body() -> Value {
    json!({
        "name": "Ana",
        "email": "ana@x.com",
        "cpf": "12345678901",
        "password": "secret1",
    })
}

async fn call(repo: MockUserRepository, req: actix_test::TestRequest) -> (StatusCode, Value) {
    let state = HttpState::new(Arc::new(repo));
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .wrap(NormalizePath::trim())
            .configure(configure),
    )
    .await;
    let res = actix_test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body is JSON")
    };
    (status, value)
}

fn user_fields(value: &Value) -> Value {
    json!({
        "name": value["name"],
        "email": value["email"],
        "cpf": value["cpf"],
        "password": value["password"],
    })
}

#[rstest]
#[actix_web::test]
async fn create_returns_201_with_the_stored_document() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .times(1)
        .returning(|new_user: NewUser| Ok(User::new(UserId::random(), new_user)));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(valid_body()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user_fields(&body), valid_body());
    let id = body["id"].as_str().expect("id is a string");
    assert!(UserId::parse(id).is_ok());
    assert!(body.get("errors").is_none());
}

#[rstest]
#[actix_web::test]
async fn create_reports_every_violation_without_touching_the_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let (status, body) = call(
        repo,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({"name": 7, "email": "nope", "cpf": "123", "password": "1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(
        body["errors"],
        json!([
            {"field": "name", "message": "Name must be a string"},
            {"field": "email", "message": "Email must be valid"},
            {"field": "cpf", "message": "CPF must have 11 characters"},
            {"field": "password", "message": "Password must be at least 6 characters long"},
        ])
    );
}

#[rstest]
#[actix_web::test]
async fn create_store_failures_are_bad_requests_with_detail() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .times(1)
        .returning(|_| Err(UserPersistenceError::constraint("users_cpf_length")));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(valid_body()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Could not create user");
    assert_eq!(
        body["details"]["reason"],
        "user repository rejected the document: users_cpf_length"
    );
}

#[rstest]
#[case("/users")]
#[case("/users/")]
#[actix_web::test]
async fn list_returns_every_user(#[case] uri: &str, ana: User) {
    let mut repo = MockUserRepository::new();
    let stored = vec![ana.clone()];
    repo.expect_find_all()
        .times(1)
        .return_once(move || Ok(stored));

    let (status, body) = call(repo, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([serde_json::to_value(&ana).expect("serialises")]));
}

#[rstest]
#[actix_web::test]
async fn list_store_failures_are_opaque_500s() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_all()
        .times(1)
        .return_once(|| Err(UserPersistenceError::connection("password authentication failed")));

    let (status, body) = call(repo, actix_test::TestRequest::get().uri("/users")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Error fetching users");
    assert!(body.get("details").is_none());
}

#[rstest]
#[case::get(actix_test::TestRequest::get())]
#[case::delete(actix_test::TestRequest::delete())]
#[actix_web::test]
async fn malformed_ids_are_rejected(#[case] req: actix_test::TestRequest) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().never();
    repo.expect_delete_by_id().never();

    let (status, body) = call(repo, req.uri("/users/not-a-valid-id")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID format");
}

#[rstest]
#[actix_web::test]
async fn get_returns_the_user(ana: User) {
    let mut repo = MockUserRepository::new();
    let expected_id = *ana.id();
    let found = ana.clone();
    repo.expect_find_by_id()
        .withf(move |id| *id == expected_id)
        .times(1)
        .return_once(move |_| Ok(Some(found)));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::get().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(&ana).expect("serialises"));
}

#[rstest]
#[actix_web::test]
async fn get_reports_missing_users_as_404() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::get().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[rstest]
#[actix_web::test]
async fn get_store_failures_answer_invalid_id() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("down")));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::get().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "Invalid ID format");
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn update_validates_the_body_before_the_id() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_by_id().never();

    let (status, body) = call(
        repo,
        actix_test::TestRequest::put()
            .uri("/users/not-a-valid-id")
            .set_json(json!({"cpf": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([{"field": "cpf", "message": "CPF must have 11 characters"}])
    );
}

#[rstest]
#[actix_web::test]
async fn update_passes_only_supplied_fields(ana: User) {
    let mut repo = MockUserRepository::new();
    repo.expect_update_by_id()
        .withf(|_, changes: &UserChanges| {
            changes.name.as_ref().map(AsRef::as_ref) == Some("Ana Maria")
                && changes.email.is_none()
                && changes.cpf.is_none()
                && changes.password.is_none()
        })
        .times(1)
        .return_once(move |_, changes| Ok(Some(ana.with_changes(changes))));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{ID}"))
            .set_json(json!({"name": "Ana Maria"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana Maria");
    assert_eq!(body["email"], "ana@x.com");
}

#[rstest]
#[actix_web::test]
async fn update_reports_missing_users_as_404() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_by_id()
        .times(1)
        .return_once(|_, _| Ok(None));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{ID}"))
            .set_json(json!({"name": "Ana Maria"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[rstest]
#[actix_web::test]
async fn delete_returns_the_removed_user(ana: User) {
    let mut repo = MockUserRepository::new();
    let removed = ana.clone();
    repo.expect_delete_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(removed)));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::delete().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "User deleted successfully",
            "user": serde_json::to_value(&ana).expect("serialises"),
        })
    );
}

#[rstest]
#[actix_web::test]
async fn delete_store_failures_use_a_fixed_message() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete_by_id()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::query("deadlock detected")));

    let (status, body) = call(
        repo,
        actix_test::TestRequest::delete().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error deleting user");
    assert!(!body.to_string().contains("deadlock"));
}
