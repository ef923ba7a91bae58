//! Diesel and pool error mapping into [`UserPersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::UserValidationError;
use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

/// Map pool failures onto the connection variant.
pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    UserPersistenceError::connection(message)
}

/// Map Diesel failures onto persistence variants.
///
/// Constraint violations keep the constraint name so callers can tell which
/// rule the store rejected.
pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(
            kind @ (DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::UniqueViolation),
            info,
        ) => {
            let detail = info
                .constraint_name()
                .map_or_else(|| format!("{kind:?}"), str::to_owned);
            UserPersistenceError::constraint(detail)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Rows that no longer satisfy the domain rules are reported as query failures.
pub(super) fn map_row_error(error: UserValidationError) -> UserPersistenceError {
    UserPersistenceError::query(format!("stored user is invalid: {error}"))
}
