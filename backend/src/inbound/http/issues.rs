//! Issues API handlers.
//!
//! ```text
//! GET    /issues?user=<id>&user[]=<id>&status=new&page=1&pageSize=100
//! POST   /issues {"latitude":46.5,"longitude":6.6,"tags":["pothole"]}
//! GET    /issues/{id}
//! PATCH  /issues/{id} {"status":"completed"}
//! DELETE /issues/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde_json::Value;

use crate::domain::ports::{
    CreateIssueRequest, DeleteIssueRequest, ListIssuesRequest, ListIssuesResponse,
    PatchIssueRequest,
};
use crate::domain::{ApiResult, Error};
use crate::inbound::http::list_params::{ListParams, paginated};
use crate::inbound::http::loaders::LoadedIssue;
use crate::inbound::http::patch::issue_patch;
use crate::inbound::http::schemas::{IssueBody, IssuePayload};
use crate::inbound::http::state::HttpState;

/// List issues, optionally filtered by reporter and status.
#[utoipa::path(
    get,
    path = "/issues",
    params(
        ("user" = Option<String>, Query,
            description = "Reporter id; repeat the key or use `user[]` for several"),
        ("status" = Option<String>, Query,
            description = "One of new, inProgress, canceled, completed; other values match nothing"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Records per page, at most 100")
    ),
    responses(
        (status = 200, description = "Page of issues", body = [IssueBody],
            headers(("Link" = String, description = "RFC 8288 navigation links"))),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["issues"],
    operation_id = "listIssues"
)]
#[get("/issues")]
pub async fn list_issues(
    state: web::Data<HttpState>,
    params: ListParams,
) -> ApiResult<HttpResponse> {
    let filter = params.issue_filter();
    let page = params.page();
    let ListIssuesResponse { issues, total } = state
        .issues_query
        .list_issues(ListIssuesRequest { filter, page })
        .await?;
    let body: Vec<IssueBody> = issues.iter().map(IssueBody::from).collect();
    paginated(&state.public_base_url, "/issues", page, total, &body)
}

/// Fetch one issue.
#[utoipa::path(
    get,
    path = "/issues/{id}",
    params(("id" = String, Path, description = "Issue identifier")),
    responses(
        (status = 200, description = "Issue", body = IssueBody),
        (status = 404, description = "No such issue", body = String, content_type = "text/plain")
    ),
    tags = ["issues"],
    operation_id = "getIssue"
)]
#[get("/issues/{id}")]
pub async fn get_issue(issue: LoadedIssue) -> web::Json<IssueBody> {
    web::Json(IssueBody::from(&issue.0))
}

/// Report a new issue.
#[utoipa::path(
    post,
    path = "/issues",
    request_body = IssuePayload,
    responses(
        (status = 201, description = "Created issue", body = IssueBody),
        (status = 400, description = "Validation failed or unknown reporter", body = Error)
    ),
    tags = ["issues"],
    operation_id = "createIssue"
)]
#[post("/issues")]
pub async fn create_issue(
    state: web::Data<HttpState>,
    payload: web::Json<IssuePayload>,
) -> ApiResult<HttpResponse> {
    let issue = state
        .issues
        .create_issue(CreateIssueRequest {
            input: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/issues/{}", issue.id())))
        .json(IssueBody::from(&issue)))
}

/// Update the whitelisted fields of an issue.
///
/// `updatedAt` may be sent but the stored value is the time of the write.
#[utoipa::path(
    patch,
    path = "/issues/{id}",
    params(("id" = String, Path, description = "Issue identifier")),
    request_body = IssuePayload,
    responses(
        (status = 200, description = "Updated issue", body = IssueBody),
        (status = 400, description = "Validation failed", body = Error),
        (status = 404, description = "No such issue", body = String, content_type = "text/plain")
    ),
    tags = ["issues"],
    operation_id = "patchIssue"
)]
#[patch("/issues/{id}")]
pub async fn patch_issue(
    state: web::Data<HttpState>,
    issue: LoadedIssue,
    body: web::Json<Value>,
) -> ApiResult<web::Json<IssueBody>> {
    let patch = issue_patch(body.into_inner())?;
    let patched = state
        .issues
        .patch_issue(PatchIssueRequest {
            issue: issue.into_inner(),
            patch,
        })
        .await?;
    Ok(web::Json(IssueBody::from(&patched)))
}

/// Delete an issue.
#[utoipa::path(
    delete,
    path = "/issues/{id}",
    params(("id" = String, Path, description = "Issue identifier")),
    responses(
        (status = 204, description = "Issue deleted"),
        (status = 404, description = "No such issue", body = String, content_type = "text/plain")
    ),
    tags = ["issues"],
    operation_id = "deleteIssue"
)]
#[delete("/issues/{id}")]
pub async fn delete_issue(
    state: web::Data<HttpState>,
    issue: LoadedIssue,
) -> ApiResult<HttpResponse> {
    state
        .issues
        .delete_issue(DeleteIssueRequest {
            issue_id: *issue.0.id(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
