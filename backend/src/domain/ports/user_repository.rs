//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The store rejected a document that violates one of its constraints.
        Constraint { message: String } => "user repository rejected the document: {message}",
    }
}

/// Storage gateway for user documents.
///
/// Implementations assign identifiers on insert and report a missing
/// document as `Ok(None)` rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the stored document.
    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch every stored user in insertion order.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Apply `changes` to the user and return the post-update document.
    async fn update_by_id(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user and return the document as it was before deletion.
    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
