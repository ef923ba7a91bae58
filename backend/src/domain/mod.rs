//! Domain primitives and ports.
//!
//! Purpose: define the strongly typed user entity, its field rules and the
//! persistence port the HTTP adapter drives. Types are transport agnostic;
//! serialisation contracts are documented on each type.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): stored user document.
//! - TraceId (alias to `trace_id::TraceId`): request correlation id.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError, FieldError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    CPF_LENGTH, Cpf, EmailAddress, NewUser, PASSWORD_MIN_LENGTH, Password, User, UserChanges,
    UserId, UserName, UserValidationError, has_cpf_length, is_valid_email, meets_password_length,
};
