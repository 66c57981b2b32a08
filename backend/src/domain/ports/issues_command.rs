//! Driving port for issue mutations.

use async_trait::async_trait;

use crate::domain::{Error, Issue, IssueId, IssueInput, IssuePatch};

/// Request to report a new issue.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIssueRequest {
    pub input: IssueInput,
}

/// Request to apply a whitelisted partial update to a loaded issue.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchIssueRequest {
    pub issue: Issue,
    pub patch: IssuePatch,
}

/// Request to delete an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteIssueRequest {
    pub issue_id: IssueId,
}

/// Driving port for issue write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssuesCommand: Send + Sync {
    /// Validate and store a new issue.
    ///
    /// A `user` reference must resolve to a stored user; otherwise the
    /// request fails validation on that field.
    async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, Error>;

    /// Merge a partial update and refresh `updatedAt`. An empty patch writes
    /// nothing and returns the issue unchanged.
    async fn patch_issue(&self, request: PatchIssueRequest) -> Result<Issue, Error>;

    /// Delete an issue.
    async fn delete_issue(&self, request: DeleteIssueRequest) -> Result<(), Error>;
}
