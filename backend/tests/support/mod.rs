//! Shared helpers for the HTTP contract tests.
//!
//! Integration tests compile as separate crates, so the app is assembled here
//! from the public library surface over the in-memory store.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{LINK, LOCATION};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use civic_backend::Trace;
use civic_backend::domain::{IssuesService, UsersService};
use civic_backend::inbound::http::configure;
use civic_backend::inbound::http::error::json_error_handler;
use civic_backend::inbound::http::state::{HttpState, HttpStatePorts};
use civic_backend::outbound::memory::{MemoryIssueRepository, MemoryUserRepository};

pub const BASE_URL: &str = "http://civic.test";

/// Captured response parts.
pub struct Reply {
    pub status: StatusCode,
    pub link: Option<String>,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

impl Reply {
    /// Body as text, for `text/plain` responses.
    pub fn text(&self) -> &str {
        self.body.as_str().unwrap_or_default()
    }
}

fn memory_state() -> web::Data<HttpState> {
    let users = Arc::new(MemoryUserRepository::new());
    let issues = Arc::new(MemoryIssueRepository::new());
    let clock = Arc::new(DefaultClock);
    let user_service = Arc::new(UsersService::new(
        Arc::clone(&users),
        Arc::clone(&issues),
        clock.clone(),
    ));
    let issue_service = Arc::new(IssuesService::new(issues, users, clock));
    web::Data::new(HttpState::new(
        HttpStatePorts {
            users_query: user_service.clone(),
            users: user_service,
            issues_query: issue_service.clone(),
            issues: issue_service,
        },
        BASE_URL,
    ))
}

/// Application wired the way the server binary wires it, over empty stores.
pub fn memory_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(memory_state())
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .configure(configure)
}

fn header(res: &ServiceResponse, name: actix_web::http::header::HeaderName) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Send `request` and capture the parts the contract tests inspect.
pub async fn send<S>(app: &S, request: test::TestRequest) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status();
    let link = header(&res, LINK);
    let location = header(&res, LOCATION);
    let content_type = header(&res, actix_web::http::header::CONTENT_TYPE);
    let bytes = test::read_body(res).await;
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    Reply {
        status,
        link,
        location,
        content_type,
        body,
    }
}

/// Create a citizen and return its id.
pub async fn create_user<S>(app: &S, first: &str, last: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "firstName": first, "lastName": last, "role": "citizen" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    id_of(&reply.body)
}

/// Create an issue, optionally attributed to `user`, and return its id.
pub async fn create_issue<S>(app: &S, user: Option<&str>, status: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut payload = json!({
        "status": status,
        "latitude": 46.52,
        "longitude": 6.63,
        "tags": ["pothole"],
    });
    if let Some(user) = user {
        payload["user"] = json!(user);
    }
    let reply = send(
        app,
        test::TestRequest::post().uri("/issues").set_json(payload),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    id_of(&reply.body)
}

/// The `id` field of a JSON record.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id present").to_owned()
}

/// Relations named in a `Link` header, in order.
pub fn relations(link: &str) -> Vec<String> {
    link.split(", ")
        .filter_map(|part| part.split("rel=\"").nth(1))
        .map(|rel| rel.trim_end_matches('"').to_owned())
        .collect()
}
