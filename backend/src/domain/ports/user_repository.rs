//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds this first and last name.
        DuplicateName { first_name: String, last_name: String } =>
            "a user named {first_name} {last_name} already exists",
    }
}

/// Port for reading and writing users.
///
/// Listings are ordered by last name, then first name, then id, so page
/// boundaries are stable between requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Count every stored user.
    async fn count(&self) -> Result<u64, UserRepositoryError>;

    /// Read one page of users.
    async fn list(&self, window: PageWindow) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Whether a user with this identifier is stored.
    async fn exists(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Store a new user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Overwrite a stored user. Returns `false` when the user is gone.
    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError>;

    /// Remove a user. Returns `false` when nothing was removed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
