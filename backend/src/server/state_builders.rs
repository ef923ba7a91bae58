//! Builders for the HTTP state ports.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::UserRepository;
use crate::inbound::http::state::HttpState;
use crate::outbound::InMemoryUserRepository;
use crate::outbound::persistence::{DbPool, DieselUserRepository};

/// Pick the user repository: PostgreSQL when a pool is available, the
/// in-memory store otherwise.
pub(crate) fn build_user_repository(pool: Option<DbPool>) -> Arc<dyn UserRepository> {
    match pool {
        Some(pool) => {
            info!(backend = "postgres", "user repository selected");
            Arc::new(DieselUserRepository::new(pool))
        }
        None => {
            warn!(
                backend = "memory",
                "no database configured; users are kept in memory and lost on exit"
            );
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

pub(crate) fn build_http_state(pool: Option<DbPool>) -> HttpState {
    HttpState::new(build_user_repository(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn without_a_pool_the_memory_store_is_used() {
        let state = build_http_state(None);
        let users = state.users.find_all().await.expect("memory store lists");
        assert!(users.is_empty());
    }
}
