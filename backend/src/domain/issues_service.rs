//! Issue domain services.
//!
//! [`IssuesService`] implements both issue driving ports. Creating an issue
//! that names a reporter checks the user repository first; the check and the
//! insert are separate operations.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    CreateIssueRequest, DeleteIssueRequest, GetIssueRequest, IssueRepository,
    IssueRepositoryError, IssuesCommand, IssuesQuery, ListIssuesRequest, ListIssuesResponse,
    PatchIssueRequest, UserRepository,
};
use crate::domain::validation::codes;
use crate::domain::{Error, FieldViolation, Issue, IssueDraft, IssueId, UserId, ValidationErrors};

use super::users_service::map_user_repository_error;

/// Error returned when an issue cannot be loaded.
pub fn issue_not_found(id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("No issue found with ID {id}"))
}

pub(crate) fn map_issue_repository_error(error: IssueRepositoryError) -> Error {
    match error {
        IssueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("issue repository unavailable: {message}"))
        }
        IssueRepositoryError::Query { message } => {
            Error::internal(format!("issue repository error: {message}"))
        }
    }
}

/// Issue service implementing the issue driving ports.
#[derive(Clone)]
pub struct IssuesService<I, U> {
    issues: Arc<I>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<I, U> IssuesService<I, U> {
    /// Create a service over the issue and user repositories.
    pub fn new(issues: Arc<I>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            issues,
            users,
            clock,
        }
    }
}

impl<I, U> IssuesService<I, U>
where
    U: UserRepository,
{
    async fn ensure_reporter_exists(&self, user: &UserId) -> Result<(), Error> {
        let exists = self
            .users
            .exists(user)
            .await
            .map_err(map_user_repository_error)?;
        if exists {
            return Ok(());
        }
        Err(ValidationErrors::single(FieldViolation::new(
            "user",
            codes::UNKNOWN_REFERENCE,
            format!("No user found with ID {user}"),
        ))
        .into())
    }
}

#[async_trait]
impl<I, U> IssuesQuery for IssuesService<I, U>
where
    I: IssueRepository,
    U: UserRepository,
{
    async fn list_issues(&self, request: ListIssuesRequest) -> Result<ListIssuesResponse, Error> {
        let total = self
            .issues
            .count(&request.filter)
            .await
            .map_err(map_issue_repository_error)?;
        let issues = self
            .issues
            .list(&request.filter, request.page.window())
            .await
            .map_err(map_issue_repository_error)?;
        Ok(ListIssuesResponse { issues, total })
    }

    async fn get_issue(&self, request: GetIssueRequest) -> Result<Issue, Error> {
        self.issues
            .find_by_id(&request.issue_id)
            .await
            .map_err(map_issue_repository_error)?
            .ok_or_else(|| issue_not_found(request.issue_id))
    }
}

#[async_trait]
impl<I, U> IssuesCommand for IssuesService<I, U>
where
    I: IssueRepository,
    U: UserRepository,
{
    async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, Error> {
        let draft = IssueDraft::validate(request.input)?;
        if let Some(user) = draft.user.as_ref() {
            self.ensure_reporter_exists(user).await?;
        }

        let issue = Issue::new(IssueId::random(), draft, self.clock.utc());
        self.issues
            .insert(&issue)
            .await
            .map_err(map_issue_repository_error)?;
        Ok(issue)
    }

    async fn patch_issue(&self, request: PatchIssueRequest) -> Result<Issue, Error> {
        let PatchIssueRequest { issue, patch } = request;
        if patch.is_empty() {
            return Ok(issue);
        }

        let patched = issue.patched(patch, self.clock.utc())?;
        let updated = self
            .issues
            .update(&patched)
            .await
            .map_err(map_issue_repository_error)?;
        if updated {
            Ok(patched)
        } else {
            Err(issue_not_found(patched.id()))
        }
    }

    async fn delete_issue(&self, request: DeleteIssueRequest) -> Result<(), Error> {
        let deleted = self
            .issues
            .delete(&request.issue_id)
            .await
            .map_err(map_issue_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(issue_not_found(request.issue_id))
        }
    }
}

#[cfg(test)]
#[path = "issues_service_tests.rs"]
mod tests;
