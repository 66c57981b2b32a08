//! Port for issue persistence and per-user issue counts.

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{Issue, IssueFilter, IssueId, UserId, UserIssueCount};

use super::define_port_error;

define_port_error! {
    /// Errors raised by issue repository adapters.
    pub enum IssueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "issue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "issue repository query failed: {message}",
    }
}

/// Port for reading and writing issues.
///
/// Listings are ordered by status, then creation time, then id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Count the issues passing `filter`.
    async fn count(&self, filter: &IssueFilter) -> Result<u64, IssueRepositoryError>;

    /// Read one page of the issues passing `filter`.
    async fn list(
        &self,
        filter: &IssueFilter,
        window: PageWindow,
    ) -> Result<Vec<Issue>, IssueRepositoryError>;

    /// Fetch an issue by identifier.
    async fn find_by_id(&self, id: &IssueId) -> Result<Option<Issue>, IssueRepositoryError>;

    /// Store a new issue.
    async fn insert(&self, issue: &Issue) -> Result<(), IssueRepositoryError>;

    /// Overwrite a stored issue. Returns `false` when the issue is gone.
    async fn update(&self, issue: &Issue) -> Result<bool, IssueRepositoryError>;

    /// Remove an issue. Returns `false` when nothing was removed.
    async fn delete(&self, id: &IssueId) -> Result<bool, IssueRepositoryError>;

    /// Count issues per reporter, restricted to `users`.
    ///
    /// Reporters without issues are omitted from the result.
    async fn count_by_user(
        &self,
        users: &[UserId],
    ) -> Result<Vec<UserIssueCount>, IssueRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn query_error_formats_message() {
        let err = IssueRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
