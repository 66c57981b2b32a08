//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`UsersQuery`, `UsersCommand`, `IssuesQuery`,
//! `IssuesCommand`) are called by the HTTP adapter. Driven ports
//! (`UserRepository`, `IssueRepository`) are implemented by the stores.

mod macros;
pub(crate) use macros::define_port_error;

mod issue_repository;
mod issues_command;
mod issues_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use issue_repository::MockIssueRepository;
pub use issue_repository::{IssueRepository, IssueRepositoryError};
#[cfg(test)]
pub use issues_command::MockIssuesCommand;
pub use issues_command::{
    CreateIssueRequest, DeleteIssueRequest, IssuesCommand, PatchIssueRequest,
};
#[cfg(test)]
pub use issues_query::MockIssuesQuery;
pub use issues_query::{GetIssueRequest, IssuesQuery, ListIssuesRequest, ListIssuesResponse};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{
    CreateUserRequest, DeleteUserRequest, PatchUserRequest, ReplaceUserRequest, UsersCommand,
};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{GetUserRequest, ListUsersRequest, ListUsersResponse, UsersQuery};
