//! Load-by-id extractors for `/users/{id}` and `/issues/{id}` routes.
//!
//! Both extractors resolve the `{id}` path segment before the handler runs.
//! A malformed identifier and an unknown one produce the same 404 so clients
//! cannot tell the two apart.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::ports::{GetIssueRequest, GetUserRequest};
use crate::domain::{Error, Issue, IssueId, User, UserId, issue_not_found, user_not_found};
use crate::inbound::http::state::HttpState;

/// Path segment holding the record identifier.
const ID_SEGMENT: &str = "id";

fn request_parts(req: &HttpRequest) -> Result<(web::Data<HttpState>, String), Error> {
    let state = req.app_data::<web::Data<HttpState>>().cloned().ok_or_else(|| {
        error!("HttpState is not registered as app data");
        Error::internal("HTTP state is not configured")
    })?;
    let raw = req.match_info().get(ID_SEGMENT).unwrap_or_default().to_owned();
    Ok((state, raw))
}

/// User resolved from the `{id}` path segment.
#[derive(Debug, Clone)]
pub struct LoadedUser(pub User);

impl LoadedUser {
    /// Unwrap the loaded user.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for LoadedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parts = request_parts(req);
        Box::pin(async move {
            let (state, raw) = parts?;
            let user_id = UserId::new(&raw).map_err(|_| user_not_found(&raw))?;
            state
                .users_query
                .get_user(GetUserRequest { user_id })
                .await
                .map(Self)
        })
    }
}

/// Issue resolved from the `{id}` path segment.
#[derive(Debug, Clone)]
pub struct LoadedIssue(pub Issue);

impl LoadedIssue {
    /// Unwrap the loaded issue.
    pub fn into_inner(self) -> Issue {
        self.0
    }
}

impl FromRequest for LoadedIssue {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parts = request_parts(req);
        Box::pin(async move {
            let (state, raw) = parts?;
            let issue_id = IssueId::new(&raw).map_err(|_| issue_not_found(&raw))?;
            state
                .issues_query
                .get_issue(GetIssueRequest { issue_id })
                .await
                .map(Self)
        })
    }
}
