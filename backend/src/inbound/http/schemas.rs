//! Wire representations of the domain entities.
//!
//! Domain types stay free of serde and utoipa derives for their stored form.
//! These DTOs own the camelCase JSON shape and the OpenAPI schemas, and
//! convert to and from the domain types at the adapter edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Issue, IssueInput, User, UserInput, UserWithIssueCount};

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "citizen")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            first_name: user.first_name().as_str().to_owned(),
            last_name: user.last_name().as_str().to_owned(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Entry of the user listing, enriched with the number of reported issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    #[serde(flatten)]
    pub user: UserBody,
    #[schema(example = 3)]
    pub reported_issue_count: u64,
}

impl From<&UserWithIssueCount> for UserListItem {
    fn from(entry: &UserWithIssueCount) -> Self {
        Self {
            user: UserBody::from(&entry.user),
            reported_issue_count: entry.reported_issue_count,
        }
    }
}

/// Body of `POST /users` and `PUT /users/{id}`.
///
/// Every field is optional at the JSON level so a missing field is reported
/// as a field-level validation failure instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
    #[schema(example = "citizen")]
    pub role: Option<String>,
}

impl From<UserPayload> for UserInput {
    fn from(value: UserPayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            role: value.role,
        }
    }
}

/// Issue as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueBody {
    #[schema(example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub id: String,
    #[schema(example = "inProgress")]
    pub status: String,
    #[schema(example = "Broken streetlight")]
    pub description: Option<String>,
    #[schema(example = "https://img.example.org/streetlight.jpg")]
    pub image_url: Option<String>,
    #[schema(example = 46.52)]
    pub latitude: f64,
    #[schema(example = 6.63)]
    pub longitude: f64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user: Option<String>,
}

impl From<&Issue> for IssueBody {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id().to_string(),
            status: issue.status().as_str().to_owned(),
            description: issue.description().map(str::to_owned),
            image_url: issue.image_url().map(str::to_owned),
            latitude: issue.latitude(),
            longitude: issue.longitude(),
            tags: issue.tags().to_vec(),
            created_at: issue.created_at(),
            updated_at: issue.updated_at(),
            user: issue.user().map(ToString::to_string),
        }
    }
}

/// Body of `POST /issues`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuePayload {
    #[schema(example = "new")]
    pub status: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = 46.52)]
    pub latitude: Option<f64>,
    #[schema(example = 6.63)]
    pub longitude: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub user: Option<String>,
}

impl From<IssuePayload> for IssueInput {
    fn from(value: IssuePayload) -> Self {
        Self {
            status: value.status,
            description: value.description,
            image_url: value.image_url,
            latitude: value.latitude,
            longitude: value.longitude,
            tags: value.tags,
            user: value.user,
        }
    }
}
