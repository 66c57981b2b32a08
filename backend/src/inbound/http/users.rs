//! Users API handlers.
//!
//! ```text
//! GET    /users?page=1&pageSize=100
//! POST   /users {"firstName":"Ada","lastName":"Lovelace","role":"citizen"}
//! GET    /users/{id}
//! GET    /users/{id}/issues
//! PUT    /users/{id}
//! PATCH  /users/{id} {"role":"manager"}
//! DELETE /users/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde_json::Value;

use crate::domain::ports::{
    CreateUserRequest, DeleteUserRequest, ListIssuesRequest, ListIssuesResponse, ListUsersRequest,
    ListUsersResponse, PatchUserRequest, ReplaceUserRequest,
};
use crate::domain::{ApiResult, Error, IssueFilter};
use crate::inbound::http::list_params::{ListParams, paginated};
use crate::inbound::http::loaders::LoadedUser;
use crate::inbound::http::patch::user_patch;
use crate::inbound::http::schemas::{IssueBody, UserBody, UserListItem, UserPayload};
use crate::inbound::http::state::HttpState;

/// List users with the number of issues each one reported.
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Records per page, at most 100")
    ),
    responses(
        (status = 200, description = "Page of users", body = [UserListItem],
            headers(("Link" = String, description = "RFC 8288 navigation links"))),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: ListParams,
) -> ApiResult<HttpResponse> {
    let page = params.page();
    let ListUsersResponse { users, total } = state
        .users_query
        .list_users(ListUsersRequest { page })
        .await?;
    let body: Vec<UserListItem> = users.iter().map(UserListItem::from).collect();
    paginated(&state.public_base_url, "/users", page, total, &body)
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 404, description = "No such user", body = String, content_type = "text/plain")
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(user: LoadedUser) -> web::Json<UserBody> {
    web::Json(UserBody::from(&user.0))
}

/// List the issues reported by one user.
#[utoipa::path(
    get,
    path = "/users/{id}/issues",
    params(
        ("id" = String, Path, description = "User identifier"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Records per page, at most 100")
    ),
    responses(
        (status = 200, description = "Page of issues, least recently updated first", body = [IssueBody],
            headers(("Link" = String, description = "RFC 8288 navigation links"))),
        (status = 404, description = "No such user", body = String, content_type = "text/plain")
    ),
    tags = ["users"],
    operation_id = "listUserIssues"
)]
#[get("/users/{id}/issues")]
pub async fn list_user_issues(
    state: web::Data<HttpState>,
    user: LoadedUser,
    params: ListParams,
) -> ApiResult<HttpResponse> {
    let user_id = *user.0.id();
    let page = params.page();
    let ListIssuesResponse { issues, total } = state
        .issues_query
        .list_issues(ListIssuesRequest {
            filter: IssueFilter::reported_by(user_id),
            page,
        })
        .await?;
    let body: Vec<IssueBody> = issues.iter().map(IssueBody::from).collect();
    let path = format!("/users/{user_id}/issues");
    paginated(&state.public_base_url, &path, page, total, &body)
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Created user", body = UserBody),
        (status = 400, description = "Validation failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users
        .create_user(CreateUserRequest {
            input: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/users/{}", user.id())))
        .json(UserBody::from(&user)))
}

/// Replace every mutable field of a user.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "Replaced user", body = UserBody),
        (status = 400, description = "Validation failed", body = Error),
        (status = 404, description = "No such user", body = String, content_type = "text/plain")
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    user: LoadedUser,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<UserBody>> {
    let replaced = state
        .users
        .replace_user(ReplaceUserRequest {
            user: user.into_inner(),
            input: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(UserBody::from(&replaced)))
}

/// Update the whitelisted fields of a user.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "Updated user", body = UserBody),
        (status = 400, description = "Validation failed", body = Error),
        (status = 404, description = "No such user", body = String, content_type = "text/plain")
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    user: LoadedUser,
    body: web::Json<Value>,
) -> ApiResult<web::Json<UserBody>> {
    let patch = user_patch(body.into_inner())?;
    let patched = state
        .users
        .patch_user(PatchUserRequest {
            user: user.into_inner(),
            patch,
        })
        .await?;
    Ok(web::Json(UserBody::from(&patched)))
}

/// Delete a user. Their issues are kept.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = String, content_type = "text/plain")
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: LoadedUser,
) -> ApiResult<HttpResponse> {
    state
        .users
        .delete_user(DeleteUserRequest {
            user_id: *user.0.id(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
