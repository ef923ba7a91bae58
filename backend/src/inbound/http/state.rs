//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Storage gateway for user documents.
    pub users: Arc<dyn UserRepository>,
}

impl HttpState {
    /// Bundle the user repository for handlers.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}
