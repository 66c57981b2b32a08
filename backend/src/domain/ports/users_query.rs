//! Driving port for user reads.
//!
//! Inbound adapters use this port to list and load users without depending
//! on repository details.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, User, UserId, UserWithIssueCount};

/// Request for one page of users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUsersRequest {
    pub page: PageRequest,
}

/// One page of users with their issue counts, plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersResponse {
    pub users: Vec<UserWithIssueCount>,
    pub total: u64,
}

/// Request to load one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetUserRequest {
    pub user_id: UserId,
}

/// Driving port for user read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// List a page of users, each with the number of issues they reported.
    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersResponse, Error>;

    /// Load one user; a missing user is [`crate::domain::ErrorCode::NotFound`].
    async fn get_user(&self, request: GetUserRequest) -> Result<User, Error>;
}
