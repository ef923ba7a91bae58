//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape and live in the inbound adapter,
//! where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::FieldError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldErrorSchema {
    /// Offending request body field.
    #[schema(example = "cpf")]
    field: String,
    /// Violated rule.
    #[schema(example = "CPF must have 11 characters")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Validation failed")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(rename = "traceId", example = "6f9619ff-8b86-d011-b42d-00c04fc964ff")]
    trace_id: Option<String>,
    /// Supplementary details; never present on internal errors.
    details: Option<serde_json::Value>,
    /// Field-level violations, present when validation fails.
    errors: Option<Vec<FieldErrorSchema>>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Identifier assigned on creation.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ana")]
    name: String,
    #[schema(example = "ana@x.com")]
    email: String,
    /// Exactly 11 characters.
    #[schema(example = "12345678901")]
    cpf: String,
    /// Returned as stored.
    #[schema(example = "secret1")]
    password: String,
}

/// Request body for `POST /users`.
///
/// Numbers and booleans are accepted for text fields and stored as their
/// JSON text.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateUserRequest {
    #[schema(example = "Ana")]
    name: String,
    #[schema(example = "ana@x.com")]
    email: String,
    #[schema(example = "12345678901", min_length = 11, max_length = 11)]
    cpf: String,
    #[schema(example = "secret1", min_length = 6)]
    password: String,
}

/// Request body for `PUT /users/{id}`; absent fields are left unchanged.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
    #[schema(min_length = 11, max_length = 11)]
    cpf: Option<String>,
    #[schema(min_length = 6)]
    password: Option<String>,
}

/// OpenAPI schema for the `DELETE /users/{id}` body.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::users::DeleteUserResponse)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeleteUserResponseSchema {
    #[schema(example = "User deleted successfully")]
    message: String,
    user: UserSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in ["invalid_request", "not_found", "internal_error"] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("errors"));
    }

    #[test]
    fn user_schema_exposes_every_document_field() {
        assert_eq!(UserSchema::name(), "crate.domain.User");
        let schema_json = schema_to_json::<UserSchema>();
        for field in ["id", "name", "email", "cpf", "password"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
