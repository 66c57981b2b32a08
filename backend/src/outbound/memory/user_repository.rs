//! Memory-backed `UserRepository`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

use super::{read, window_of, write};

/// Users held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    rows: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_name(a: &User, b: &User) -> bool {
    a.first_name() == b.first_name() && a.last_name() == b.last_name()
}

fn duplicate(user: &User) -> UserRepositoryError {
    UserRepositoryError::duplicate_name(user.first_name().as_str(), user.last_name().as_str())
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let rows = read(&self.rows).map_err(UserRepositoryError::query)?;
        Ok(rows.len() as u64)
    }

    async fn list(&self, window: PageWindow) -> Result<Vec<User>, UserRepositoryError> {
        let rows = read(&self.rows).map_err(UserRepositoryError::query)?;
        let mut users: Vec<User> = rows.values().cloned().collect();
        drop(rows);
        users.sort_by(|a, b| {
            a.last_name()
                .as_str()
                .cmp(b.last_name().as_str())
                .then_with(|| a.first_name().as_str().cmp(b.first_name().as_str()))
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(window_of(users, window))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let rows = read(&self.rows).map_err(UserRepositoryError::query)?;
        Ok(rows.get(id).cloned())
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let rows = read(&self.rows).map_err(UserRepositoryError::query)?;
        Ok(rows.contains_key(id))
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut rows = write(&self.rows).map_err(UserRepositoryError::query)?;
        if rows.values().any(|other| same_name(other, user)) {
            return Err(duplicate(user));
        }
        rows.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut rows = write(&self.rows).map_err(UserRepositoryError::query)?;
        if !rows.contains_key(user.id()) {
            return Ok(false);
        }
        if rows
            .values()
            .any(|other| other.id() != user.id() && same_name(other, user))
        {
            return Err(duplicate(user));
        }
        rows.insert(*user.id(), user.clone());
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut rows = write(&self.rows).map_err(UserRepositoryError::query)?;
        Ok(rows.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the memory user store.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{UserDraft, UserInput};

    fn user(first: &str, last: &str) -> User {
        let draft = UserDraft::validate(UserInput {
            first_name: Some(first.to_owned()),
            last_name: Some(last.to_owned()),
            role: Some("citizen".to_owned()),
        })
        .expect("valid user");
        User::new(UserId::random(), draft, Utc::now())
    }

    #[fixture]
    fn repo() -> MemoryUserRepository {
        MemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_names(repo: MemoryUserRepository) {
        repo.insert(&user("Ada", "Lovelace")).await.expect("first insert");
        let err = repo
            .insert(&user("Ada", "Lovelace"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, UserRepositoryError::DuplicateName { .. }));
        assert_eq!(repo.count().await.expect("count"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_allows_keeping_own_name_but_not_taking_another(repo: MemoryUserRepository) {
        let ada = user("Ada", "Lovelace");
        let grace = user("Grace", "Hopper");
        repo.insert(&ada).await.expect("insert ada");
        repo.insert(&grace).await.expect("insert grace");

        assert!(repo.update(&ada).await.expect("self update"));

        let clash = grace.replaced(UserDraft {
            first_name: ada.first_name().clone(),
            last_name: ada.last_name().clone(),
            role: grace.role(),
        });
        assert!(repo.update(&clash).await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_rows(repo: MemoryUserRepository) {
        let ghost = user("Casper", "Ghost");
        assert!(!repo.update(&ghost).await.expect("update"));
        assert!(!repo.delete(ghost.id()).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn list_orders_by_last_then_first_name(repo: MemoryUserRepository) {
        for (first, last) in [("Zoe", "Adams"), ("Bob", "Young"), ("Amy", "Adams")] {
            repo.insert(&user(first, last)).await.expect("insert");
        }

        let page = repo
            .list(PageWindow {
                offset: 1,
                limit: 5,
            })
            .await
            .expect("list");

        let names: Vec<&str> = page.iter().map(|u| u.first_name().as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Bob"]);
    }
}
