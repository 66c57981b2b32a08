//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserInput, UserPatch};

/// Request to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub input: UserInput,
}

/// Request to replace every mutable field of a loaded user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceUserRequest {
    pub user: User,
    pub input: UserInput,
}

/// Request to apply a whitelisted partial update to a loaded user.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchUserRequest {
    pub user: User,
    pub patch: UserPatch,
}

/// Request to delete a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteUserRequest {
    pub user_id: UserId,
}

/// Driving port for user write operations.
///
/// Validation failures and name collisions surface as
/// [`crate::domain::ErrorCode::InvalidRequest`] with field details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and store a new user.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Replace a user with a complete payload, keeping id and creation time.
    async fn replace_user(&self, request: ReplaceUserRequest) -> Result<User, Error>;

    /// Merge a partial update. An empty patch writes nothing.
    async fn patch_user(&self, request: PatchUserRequest) -> Result<User, Error>;

    /// Delete a user. Their issues are left in place.
    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), Error>;
}
