//! Issue data model.
//!
//! An issue is a geolocated problem reported in public space: a broken
//! streetlight, a pothole, an overflowing bin. Citizens create them and
//! managers move them through their lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::UserId;
use super::record_id::define_record_id;
use super::validation::{
    FieldUpdate, FieldViolation, ValidationErrors, bounded_number, codes,
};

define_record_id! {
    /// Stable issue identifier stored as a UUID.
    IssueId
}

/// Maximum length of an issue description, in characters.
pub const DESCRIPTION_MAX: usize = 1000;
/// Maximum length of an image URL, in characters.
pub const IMAGE_URL_MAX: usize = 500;
/// Inclusive latitude bounds.
pub const LATITUDE_RANGE: (f64, f64) = (0.0, 90.0);
/// Inclusive longitude bounds.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueStatus {
    /// Freshly reported.
    #[default]
    New,
    /// A manager is working on it.
    InProgress,
    /// Dropped without a fix.
    Canceled,
    /// Fixed.
    Completed,
}

/// Raised when a status name is not part of the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown issue status `{0}`")]
pub struct UnknownStatus(pub String);

impl IssueStatus {
    /// Every status, in wire order.
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::New,
        IssueStatus::InProgress,
        IssueStatus::Canceled,
        IssueStatus::Completed,
    ];

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "inProgress",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }

    /// Parse a status supplied for the wire-level `status` field.
    pub fn parse_field(raw: &str) -> Result<Self, FieldViolation> {
        raw.parse().map_err(|_: UnknownStatus| {
            FieldViolation::new(
                "status",
                codes::INVALID_ENUM,
                "status must be one of: new, inProgress, canceled, completed",
            )
        })
    }
}

impl FromStr for IssueStatus {
    type Err = UnknownStatus;

    /// Case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated issue fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueInput {
    pub status: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub user: Option<String>,
}

/// Validated values for a new issue.
///
/// `user` is only known to be well formed; whether it resolves is checked by
/// the issues service against the user repository.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDraft {
    pub status: IssueStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: Vec<String>,
    pub user: Option<UserId>,
}

impl IssueDraft {
    /// Validate a creation payload, reporting every failing field.
    pub fn validate(input: IssueInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let status = errors.capture(
            input
                .status
                .map_or(Ok(IssueStatus::default()), |raw| IssueStatus::parse_field(&raw)),
        );
        let description = errors.capture(optional_text(
            "description",
            input.description,
            DESCRIPTION_MAX,
        ));
        let image_url = errors.capture(image_reference(input.image_url));
        let latitude = errors.capture(coordinate("latitude", input.latitude, LATITUDE_RANGE));
        let longitude = errors.capture(coordinate("longitude", input.longitude, LONGITUDE_RANGE));
        let tags = errors.capture(required_tags(input.tags));
        let user = errors.capture(user_reference(input.user));

        match (status, description, image_url, latitude, longitude, tags, user) {
            (
                Some(status),
                Some(description),
                Some(image_url),
                Some(latitude),
                Some(longitude),
                Some(tags),
                Some(user),
            ) => errors.finish(Self {
                status,
                description,
                image_url,
                latitude,
                longitude,
                tags,
                user,
            }),
            _ => Err(errors),
        }
    }
}

fn optional_text(
    field: &'static str,
    raw: Option<String>,
    max: usize,
) -> Result<Option<String>, FieldViolation> {
    match raw {
        Some(value) if value.chars().count() > max => Err(FieldViolation::new(
            field,
            codes::TOO_LONG,
            format!("{field} must be at most {max} characters"),
        )),
        other => Ok(other),
    }
}

/// Image links must be absolute URLs within [`IMAGE_URL_MAX`] characters.
fn image_reference(raw: Option<String>) -> Result<Option<String>, FieldViolation> {
    match optional_text("imageUrl", raw, IMAGE_URL_MAX)? {
        Some(value) if url::Url::parse(&value).is_err() => Err(FieldViolation::new(
            "imageUrl",
            codes::INVALID_URL,
            format!("imageUrl `{value}` is not an absolute URL"),
        )),
        other => Ok(other),
    }
}

fn coordinate(
    field: &'static str,
    raw: Option<f64>,
    (min, max): (f64, f64),
) -> Result<f64, FieldViolation> {
    raw.ok_or_else(|| FieldViolation::required(field))
        .and_then(|value| bounded_number(field, value, min, max))
}

fn required_tags(raw: Option<Vec<String>>) -> Result<Vec<String>, FieldViolation> {
    match raw {
        None => Err(FieldViolation::required("tags")),
        Some(tags) if tags.is_empty() => Err(FieldViolation::new(
            "tags",
            codes::EMPTY_LIST,
            "tags must contain at least one entry",
        )),
        Some(tags) => Ok(tags),
    }
}

fn user_reference(raw: Option<String>) -> Result<Option<UserId>, FieldViolation> {
    raw.map(|value| {
        UserId::new(&value).map_err(|_| {
            FieldViolation::new(
                "user",
                codes::INVALID_ID,
                format!("user `{value}` is not a valid identifier"),
            )
        })
    })
    .transpose()
}

/// Partial update restricted to the issue whitelist.
///
/// `updatedAt` is whitelisted on the wire but never carried here: the stored
/// value always comes from the clock at write time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuePatch {
    pub status: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
    pub image_url: FieldUpdate<String>,
    pub latitude: FieldUpdate<f64>,
    pub longitude: FieldUpdate<f64>,
}

impl IssuePatch {
    /// Whether the patch touches no stored field.
    pub fn is_empty(&self) -> bool {
        self.status.is_unchanged()
            && self.description.is_unchanged()
            && self.image_url.is_unchanged()
            && self.latitude.is_unchanged()
            && self.longitude.is_unchanged()
    }
}

/// Reported issue.
///
/// ## Invariants
/// - `latitude` lies in `[0, 90]` and `longitude` in `[-180, 180]`.
/// - `tags` holds at least one entry.
/// - `updated_at` is never earlier than `created_at` for writes made through
///   the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    id: IssueId,
    status: IssueStatus,
    description: Option<String>,
    image_url: Option<String>,
    latitude: f64,
    longitude: f64,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user: Option<UserId>,
}

impl Issue {
    /// Build a freshly created issue; both timestamps are `now`.
    pub fn new(id: IssueId, draft: IssueDraft, now: DateTime<Utc>) -> Self {
        let IssueDraft {
            status,
            description,
            image_url,
            latitude,
            longitude,
            tags,
            user,
        } = draft;
        Self {
            id,
            status,
            description,
            image_url,
            latitude,
            longitude,
            tags,
            created_at: now,
            updated_at: now,
            user,
        }
    }

    /// Rebuild an issue read back from a store, re-checking its invariants.
    pub fn restore(
        id: IssueId,
        stored: IssueInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let draft = IssueDraft::validate(stored)?;
        Ok(Self {
            updated_at,
            ..Self::new(id, draft, created_at)
        })
    }

    /// Merge a partial update onto this issue and stamp `updated_at`.
    pub fn patched(&self, patch: IssuePatch, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let status = errors.capture(match patch.status {
            FieldUpdate::Unchanged => Ok(self.status),
            FieldUpdate::Cleared => Err(FieldViolation::required("status")),
            FieldUpdate::Set(raw) => IssueStatus::parse_field(&raw),
        });
        let description = errors.capture(merge_text(
            "description",
            patch.description,
            &self.description,
            DESCRIPTION_MAX,
        ));
        let image_url = errors.capture(match patch.image_url {
            FieldUpdate::Unchanged => Ok(self.image_url.clone()),
            FieldUpdate::Cleared => Ok(None),
            FieldUpdate::Set(raw) => image_reference(Some(raw)),
        });
        let latitude = errors.capture(merge_coordinate(
            "latitude",
            patch.latitude,
            self.latitude,
            LATITUDE_RANGE,
        ));
        let longitude = errors.capture(merge_coordinate(
            "longitude",
            patch.longitude,
            self.longitude,
            LONGITUDE_RANGE,
        ));

        match (status, description, image_url, latitude, longitude) {
            (Some(status), Some(description), Some(image_url), Some(latitude), Some(longitude)) => {
                errors.finish(Self {
                    status,
                    description,
                    image_url,
                    latitude,
                    longitude,
                    updated_at: now,
                    ..self.clone()
                })
            }
            _ => Err(errors),
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &IssueId {
        &self.id
    }

    /// Lifecycle state.
    pub fn status(&self) -> IssueStatus {
        self.status
    }

    /// Free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Photo of the issue.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Ordered tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last write.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reporting user, when known.
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }
}

fn merge_text(
    field: &'static str,
    update: FieldUpdate<String>,
    current: &Option<String>,
    max: usize,
) -> Result<Option<String>, FieldViolation> {
    match update {
        FieldUpdate::Unchanged => Ok(current.clone()),
        FieldUpdate::Cleared => Ok(None),
        FieldUpdate::Set(raw) => optional_text(field, Some(raw), max),
    }
}

fn merge_coordinate(
    field: &'static str,
    update: FieldUpdate<f64>,
    current: f64,
    range: (f64, f64),
) -> Result<f64, FieldViolation> {
    match update {
        FieldUpdate::Unchanged => Ok(current),
        FieldUpdate::Cleared => coordinate(field, None, range),
        FieldUpdate::Set(value) => coordinate(field, Some(value), range),
    }
}
