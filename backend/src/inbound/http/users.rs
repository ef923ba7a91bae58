//! Users API handlers.
//!
//! ```text
//! POST   /users       {"name":"Ana","email":"ana@x.com","cpf":"12345678901","password":"secret1"}
//! GET    /users
//! GET    /users/{id}
//! PUT    /users/{id}  {"name":"Ana Maria"}
//! DELETE /users/{id}
//! ```
//!
//! Gateway failures are logged here with the request trace; response
//! messages never carry backend text for server-side errors.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{error, info, warn};

use crate::domain::ports::UserPersistenceError;
use crate::domain::{Error, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CreateUserRequest, DeleteUserResponseSchema, ErrorSchema, UpdateUserRequest, UserSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_new_user, parse_user_changes};

const INVALID_ID_MESSAGE: &str = "Invalid ID format";
const NOT_FOUND_MESSAGE: &str = "User not found";
const DELETED_MESSAGE: &str = "User deleted successfully";

/// Body returned by `DELETE /users/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    message: &'static str,
    user: User,
}

fn parse_id(raw: &str) -> Result<UserId, Error> {
    UserId::parse(raw).map_err(|_| Error::invalid_request(INVALID_ID_MESSAGE))
}

fn not_found() -> Error {
    Error::not_found(NOT_FOUND_MESSAGE)
}

/// Create and update failures are reported as bad requests carrying the
/// persistence failure as detail.
fn rejected(message: &str, err: &UserPersistenceError) -> Error {
    warn!(error = %err, "{}", message);
    Error::invalid_request(message).with_details(json!({ "reason": err.to_string() }))
}

/// A failed single-document lookup is reported as an unusable identifier.
fn lookup_failed(err: &UserPersistenceError) -> Error {
    warn!(error = %err, "user lookup failed");
    Error::invalid_request(INVALID_ID_MESSAGE)
}

fn backend_failure(message: &str, err: &UserPersistenceError) -> Error {
    error!(error = %err, "{}", message);
    Error::internal(message)
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Validation failed or the store rejected the user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let new_user = parse_new_user(&payload)?;
    let user = state
        .users
        .create(new_user)
        .await
        .map_err(|err| rejected("Could not create user", &err))?;
    info!(user_id = %user.id(), "user created");
    Ok(HttpResponse::Created().json(user))
}

/// List every user.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users in insertion order", body = [UserSchema]),
        (status = 500, description = "The store could not be read", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state
        .users
        .find_all()
        .await
        .map_err(|err| backend_failure("Error fetching users", &err))?;
    Ok(web::Json(users))
}

/// Fetch one user.
///
/// Any lookup failure answers 400 with the invalid-identifier message.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid ID format", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_id(&path)?;
    let user = state
        .users
        .find_by_id(&id)
        .await
        .map_err(|err| lookup_failed(&err))?
        .ok_or_else(not_found)?;
    Ok(web::Json(user))
}

/// Replace the supplied fields of a user.
///
/// The body is validated before the identifier is parsed.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Validation failed, invalid ID or the store rejected the change", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<User>> {
    let changes = parse_user_changes(&payload)?;
    let id = parse_id(&path)?;
    let user = state
        .users
        .update_by_id(&id, changes)
        .await
        .map_err(|err| rejected("Could not update user", &err))?
        .ok_or_else(not_found)?;
    info!(user_id = %user.id(), "user updated");
    Ok(web::Json(user))
}

/// Delete a user and return the removed document.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = DeleteUserResponseSchema),
        (status = 400, description = "Invalid ID format", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Error deleting user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteUserResponse>> {
    let id = parse_id(&path)?;
    let user = state
        .users
        .delete_by_id(&id)
        .await
        .map_err(|err| backend_failure("Error deleting user", &err))?
        .ok_or_else(not_found)?;
    info!(user_id = %user.id(), "user deleted");
    Ok(web::Json(DeleteUserResponse {
        message: DELETED_MESSAGE,
        user,
    }))
}

/// Register every users route on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::inbound::http::users;
///
/// let app = App::new().configure(users::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
