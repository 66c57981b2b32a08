//! Builders for the HTTP state from the configured record store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use civic_backend::domain::ports::{IssueRepository, UserRepository};
use civic_backend::domain::{IssuesService, UsersService};
use civic_backend::inbound::http::state::{HttpState, HttpStatePorts};
use civic_backend::outbound::memory::{MemoryIssueRepository, MemoryUserRepository};
use civic_backend::outbound::persistence::{DieselIssueRepository, DieselUserRepository};

use super::ServerConfig;

/// Wire both services over one pair of repositories.
fn build_ports<U, I>(users: Arc<U>, issues: Arc<I>, clock: Arc<dyn Clock>) -> HttpStatePorts
where
    U: UserRepository + 'static,
    I: IssueRepository + 'static,
{
    let user_service = Arc::new(UsersService::new(
        Arc::clone(&users),
        Arc::clone(&issues),
        Arc::clone(&clock),
    ));
    let issue_service = Arc::new(IssuesService::new(issues, users, clock));
    HttpStatePorts {
        users_query: user_service.clone(),
        users: user_service,
        issues_query: issue_service.clone(),
        issues: issue_service,
    }
}

/// Build the HTTP state, using PostgreSQL when a pool is configured and the
/// memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselIssueRepository::new(pool.clone())),
            clock,
        ),
        None => build_ports(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryIssueRepository::new()),
            clock,
        ),
    };
    web::Data::new(HttpState::new(ports, config.public_base_url.as_str()))
}
