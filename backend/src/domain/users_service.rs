//! User domain services.
//!
//! [`UsersService`] implements both user driving ports. Listings are
//! enriched with per-user issue counts, so the service also holds the issue
//! repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, IssueRepository, ListUsersRequest,
    ListUsersResponse, PatchUserRequest, ReplaceUserRequest, UserRepository, UserRepositoryError,
    UsersCommand, UsersQuery,
};
use crate::domain::validation::codes;
use crate::domain::{
    Error, FieldViolation, User, UserDraft, UserId, ValidationErrors, attach_issue_counts,
};

use super::issues_service::map_issue_repository_error;

/// Error returned when a user cannot be loaded.
pub fn user_not_found(id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("No user found with ID {id}"))
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateName {
            first_name,
            last_name,
        } => {
            let message = format!("a user named {first_name} {last_name} already exists");
            let mut errors = ValidationErrors::default();
            errors.push(FieldViolation::new("firstName", codes::DUPLICATE, message.clone()));
            errors.push(FieldViolation::new("lastName", codes::DUPLICATE, message));
            errors.into()
        }
    }
}

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UsersService<U, I> {
    users: Arc<U>,
    issues: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<U, I> UsersService<U, I> {
    /// Create a service over the user and issue repositories.
    pub fn new(users: Arc<U>, issues: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            issues,
            clock,
        }
    }
}

impl<U, I> UsersService<U, I>
where
    U: UserRepository,
{
    async fn store_update(&self, user: User) -> Result<User, Error> {
        let updated = self
            .users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;
        if updated {
            Ok(user)
        } else {
            Err(user_not_found(user.id()))
        }
    }
}

#[async_trait]
impl<U, I> UsersQuery for UsersService<U, I>
where
    U: UserRepository,
    I: IssueRepository,
{
    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersResponse, Error> {
        let total = self.users.count().await.map_err(map_user_repository_error)?;
        let users = self
            .users
            .list(request.page.window())
            .await
            .map_err(map_user_repository_error)?;
        if users.is_empty() {
            return Ok(ListUsersResponse {
                users: Vec::new(),
                total,
            });
        }

        let ids: Vec<UserId> = users.iter().map(|user| *user.id()).collect();
        let counts = self
            .issues
            .count_by_user(&ids)
            .await
            .map_err(map_issue_repository_error)?;

        Ok(ListUsersResponse {
            users: attach_issue_counts(users, &counts),
            total,
        })
    }

    async fn get_user(&self, request: GetUserRequest) -> Result<User, Error> {
        self.users
            .find_by_id(&request.user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(request.user_id))
    }
}

#[async_trait]
impl<U, I> UsersCommand for UsersService<U, I>
where
    U: UserRepository,
    I: IssueRepository,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let draft = UserDraft::validate(request.input)?;
        let user = User::new(UserId::random(), draft, self.clock.utc());
        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        Ok(user)
    }

    async fn replace_user(&self, request: ReplaceUserRequest) -> Result<User, Error> {
        let draft = UserDraft::validate(request.input)?;
        self.store_update(request.user.replaced(draft)).await
    }

    async fn patch_user(&self, request: PatchUserRequest) -> Result<User, Error> {
        let PatchUserRequest { user, patch } = request;
        if patch.is_empty() {
            return Ok(user);
        }
        let patched = user.patched(patch)?;
        self.store_update(patched).await
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(&request.user_id)
            .await
            .map_err(map_user_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(user_not_found(request.user_id))
        }
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
