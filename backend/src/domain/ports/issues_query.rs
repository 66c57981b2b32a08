//! Driving port for issue reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Issue, IssueFilter, IssueId};

/// Request for one filtered page of issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIssuesRequest {
    pub filter: IssueFilter,
    pub page: PageRequest,
}

/// One page of issues plus the total matching the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListIssuesResponse {
    pub issues: Vec<Issue>,
    pub total: u64,
}

/// Request to load one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetIssueRequest {
    pub issue_id: IssueId,
}

/// Driving port for issue read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssuesQuery: Send + Sync {
    /// Count then fetch one page of issues passing the filter.
    ///
    /// The count and the fetch are separate reads; a concurrent write can make
    /// `total` disagree with the page contents.
    async fn list_issues(&self, request: ListIssuesRequest) -> Result<ListIssuesResponse, Error>;

    /// Load one issue; a missing issue is [`crate::domain::ErrorCode::NotFound`].
    async fn get_issue(&self, request: GetIssueRequest) -> Result<Issue, Error>;
}
