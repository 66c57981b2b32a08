//! Shared HTTP adapter state.
//!
//! Handlers receive this state through `actix_web::web::Data` and only see
//! the driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IssuesCommand, IssuesQuery, UsersCommand, UsersQuery};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users_query: Arc<dyn UsersQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub issues_query: Arc<dyn IssuesQuery>,
    pub issues: Arc<dyn IssuesCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_query: Arc<dyn UsersQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub issues_query: Arc<dyn IssuesQuery>,
    pub issues: Arc<dyn IssuesCommand>,
    /// Absolute base URL pagination links are built from.
    pub public_base_url: Arc<str>,
}

impl HttpState {
    /// Construct state from a ports bundle and the public base URL.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use civic_backend::domain::UsersService;
    /// use civic_backend::domain::IssuesService;
    /// use civic_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use civic_backend::outbound::memory::{MemoryIssueRepository, MemoryUserRepository};
    /// use mockable::DefaultClock;
    ///
    /// let users = Arc::new(MemoryUserRepository::default());
    /// let issues = Arc::new(MemoryIssueRepository::default());
    /// let clock = Arc::new(DefaultClock);
    /// let user_service = Arc::new(UsersService::new(users.clone(), issues.clone(), clock.clone()));
    /// let issue_service = Arc::new(IssuesService::new(issues, users, clock));
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         users_query: user_service.clone(),
    ///         users: user_service,
    ///         issues_query: issue_service.clone(),
    ///         issues: issue_service,
    ///     },
    ///     "http://localhost:8080",
    /// );
    /// assert_eq!(&*state.public_base_url, "http://localhost:8080");
    /// ```
    pub fn new(ports: HttpStatePorts, public_base_url: impl Into<String>) -> Self {
        let HttpStatePorts {
            users_query,
            users,
            issues_query,
            issues,
        } = ports;
        Self {
            users_query,
            users,
            issues_query,
            issues,
            public_base_url: Arc::from(public_base_url.into()),
        }
    }
}
