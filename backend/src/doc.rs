//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the users and health endpoints together with the
//! schema wrappers from [`crate::inbound::http::schemas`]. The document is
//! served by Swagger UI in debug builds and printed by `openapi-dump`.

use crate::inbound::http::health::{HealthReport, Phase};
use crate::inbound::http::schemas::{
    CreateUserRequest, DeleteUserResponseSchema, ErrorCodeSchema, ErrorSchema, FieldErrorSchema,
    UpdateUserRequest, UserSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "Create, read, update and delete user records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema,
        CreateUserRequest,
        UpdateUserRequest,
        DeleteUserResponseSchema,
        HealthReport,
        Phase
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "health", description = "Process lifecycle")
    )
)]
pub struct ApiDoc;
