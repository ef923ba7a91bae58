//! In-process `UserRepository` used when no database is configured.
//!
//! Documents live in a vector guarded by a mutex, so insertion order is the
//! listing order. Contents are lost when the process exits.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserChanges, UserId};

/// Volatile user store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let stored = User::new(UserId::random(), user);
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.iter().find(|user| user.id() == id).cloned())
    }

    async fn update_by_id(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock()?;
        let Some(slot) = users.iter_mut().find(|user| user.id() == id) else {
            return Ok(None);
        };
        let updated = slot.clone().with_changes(changes);
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock()?;
        let position = users.iter().position(|user| user.id() == id);
        Ok(position.map(|index| users.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cpf, EmailAddress, Password, UserName};
    use rstest::{fixture, rstest};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: UserName::new(name),
            email: EmailAddress::new(email).expect("valid email"),
            cpf: Cpf::new("12345678901").expect("valid cpf"),
            password: Password::new("secret1").expect("valid password"),
        }
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_distinct_ids(repo: InMemoryUserRepository) {
        let ana = repo.create(new_user("Ana", "ana@x.com")).await.expect("create");
        let bia = repo.create(new_user("Bia", "bia@x.com")).await.expect("create");
        assert_ne!(ana.id(), bia.id());
    }

    #[rstest]
    #[tokio::test]
    async fn listing_follows_insertion_order(repo: InMemoryUserRepository) {
        let ana = repo.create(new_user("Ana", "ana@x.com")).await.expect("create");
        let bia = repo.create(new_user("Bia", "bia@x.com")).await.expect("create");

        let all = repo.find_all().await.expect("list");
        assert_eq!(all, vec![ana, bia]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_returns_the_post_update_document(repo: InMemoryUserRepository) {
        let ana = repo.create(new_user("Ana", "ana@x.com")).await.expect("create");
        let changes = UserChanges {
            name: Some(UserName::new("Ana Maria")),
            ..UserChanges::default()
        };

        let updated = repo
            .update_by_id(ana.id(), changes)
            .await
            .expect("update")
            .expect("user exists");

        assert_eq!(updated.name().as_ref(), "Ana Maria");
        let stored = repo.find_by_id(ana.id()).await.expect("lookup");
        assert_eq!(stored, Some(updated));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_users_are_reported_as_none(repo: InMemoryUserRepository) {
        let id = UserId::random();
        assert!(repo.find_by_id(&id).await.expect("lookup").is_none());
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
    async fn delete_returns_the_removed_document(repo: InMemoryUserRepository) {
        let ana = repo.create(new_user("Ana", "ana@x.com")).await.expect("create");

        let removed = repo.delete_by_id(ana.id()).await.expect("delete");
        assert_eq!(removed.as_ref(), Some(&ana));
        assert!(repo.find_by_id(ana.id()).await.expect("lookup").is_none());
        assert!(repo.delete_by_id(ana.id()).await.expect("delete").is_none());
    }
}
