//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    IssuesCommand, IssuesQuery, MockIssuesCommand, MockIssuesQuery, MockUsersCommand,
    MockUsersQuery, UsersCommand, UsersQuery,
};
use crate::domain::{
    Issue, IssueDraft, IssueId, IssueInput, IssuesService, User, UserDraft, UserId, UserInput,
    UsersService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{MemoryIssueRepository, MemoryUserRepository};
use crate::test_support::{MutableClock, fixture_timestamp};

/// Base URL used for pagination links in handler tests.
pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// A valid citizen created at the fixture timestamp.
pub fn fixture_user(first_name: &str, last_name: &str) -> User {
    let draft = UserDraft::validate(UserInput {
        first_name: Some(first_name.to_owned()),
        last_name: Some(last_name.to_owned()),
        role: Some("citizen".to_owned()),
    })
    .expect("fixture user is valid");
    User::new(UserId::random(), draft, fixture_timestamp())
}

/// A valid issue created at the fixture timestamp.
pub fn fixture_issue(reporter: Option<&UserId>) -> Issue {
    let draft = IssueDraft::validate(IssueInput {
        latitude: Some(46.5),
        longitude: Some(6.6),
        tags: Some(vec!["streetlight".to_owned()]),
        user: reporter.map(ToString::to_string),
        ..IssueInput::default()
    })
    .expect("fixture issue is valid");
    Issue::new(IssueId::random(), draft, fixture_timestamp())
}

/// State whose command ports reject any call.
pub fn state_with(users_query: MockUsersQuery, issues_query: MockIssuesQuery) -> HttpState {
    state_from_ports(
        Arc::new(users_query),
        Arc::new(MockUsersCommand::new()),
        Arc::new(issues_query),
        Arc::new(MockIssuesCommand::new()),
    )
}

/// State from explicit port implementations.
pub fn state_from_ports(
    users_query: Arc<dyn UsersQuery>,
    users: Arc<dyn UsersCommand>,
    issues_query: Arc<dyn IssuesQuery>,
    issues: Arc<dyn IssuesCommand>,
) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            users_query,
            users,
            issues_query,
            issues,
        },
        TEST_BASE_URL,
    )
}

/// State backed by the in-memory stores and the real services.
pub fn memory_state() -> (web::Data<HttpState>, Arc<MutableClock>) {
    let clock = Arc::new(MutableClock::default());
    let users = Arc::new(MemoryUserRepository::default());
    let issues = Arc::new(MemoryIssueRepository::default());
    let user_service = Arc::new(UsersService::new(
        Arc::clone(&users),
        Arc::clone(&issues),
        clock.clone(),
    ));
    let issue_service = Arc::new(IssuesService::new(issues, users, clock.clone()));
    let state = state_from_ports(
        user_service.clone(),
        user_service,
        issue_service.clone(),
        issue_service,
    );
    (web::Data::new(state), clock)
}

/// Application exposing every resource route over `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(state)
        .app_data(
            web::JsonConfig::default()
                .error_handler(crate::inbound::http::error::json_error_handler),
        )
        .configure(crate::inbound::http::configure)
}
