//! User data model.
//!
//! A user is either a citizen reporting issues or a manager handling them.
//! The `(first_name, last_name)` pair is unique across users; the repository
//! enforces it because a single user cannot observe its siblings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::record_id::define_record_id;
use super::validation::{FieldUpdate, FieldViolation, ValidationErrors, bounded_text, codes};

define_record_id! {
    /// Stable user identifier stored as a UUID.
    UserId
}

/// Minimum length of a first or last name, in characters.
pub const NAME_MIN: usize = 2;
/// Maximum length of a first or last name, in characters.
pub const NAME_MAX: usize = 20;

/// First or last name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name supplied for the wire-level `field`.
    pub fn parse(field: &'static str, raw: impl Into<String>) -> Result<Self, FieldViolation> {
        bounded_text(field, raw.into(), NAME_MIN, NAME_MAX).map(Self)
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a user does on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Reports issues.
    Citizen,
    /// Handles reported issues.
    Manager,
}

/// Raised when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in wire order.
    pub const ALL: [Role; 2] = [Role::Citizen, Role::Manager];

    /// Wire name of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Manager => "manager",
        }
    }

    fn parse_field(raw: &str) -> Result<Self, FieldViolation> {
        raw.parse().map_err(|_: UnknownRole| {
            FieldViolation::new(
                "role",
                codes::INVALID_ENUM,
                "role must be one of: citizen, manager",
            )
        })
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated user fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Validated values for every mutable user field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: Role,
}

impl UserDraft {
    /// Validate a complete payload, reporting every failing field.
    ///
    /// # Examples
    /// ```
    /// use civic_backend::domain::{UserDraft, UserInput};
    ///
    /// let errors = UserDraft::validate(UserInput {
    ///     first_name: Some("A".into()),
    ///     last_name: None,
    ///     role: Some("citizen".into()),
    /// })
    /// .expect_err("invalid");
    /// assert!(errors.has_field("firstName"));
    /// assert!(errors.has_field("lastName"));
    /// ```
    pub fn validate(input: UserInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let first_name = errors.capture(required_name("firstName", input.first_name));
        let last_name = errors.capture(required_name("lastName", input.last_name));
        let role = errors.capture(
            input
                .role
                .ok_or_else(|| FieldViolation::required("role"))
                .and_then(|raw| Role::parse_field(&raw)),
        );

        match (first_name, last_name, role) {
            (Some(first_name), Some(last_name), Some(role)) => errors.finish(Self {
                first_name,
                last_name,
                role,
            }),
            _ => Err(errors),
        }
    }
}

fn required_name(field: &'static str, raw: Option<String>) -> Result<PersonName, FieldViolation> {
    raw.ok_or_else(|| FieldViolation::required(field))
        .and_then(|value| PersonName::parse(field, value))
}

/// Partial update restricted to the user whitelist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: FieldUpdate<String>,
    pub last_name: FieldUpdate<String>,
    pub role: FieldUpdate<String>,
}

impl UserPatch {
    /// Whether the patch touches no field.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_unchanged() && self.last_name.is_unchanged() && self.role.is_unchanged()
    }
}

/// Application user.
///
/// ## Invariants
/// - Both names hold between [`NAME_MIN`] and [`NAME_MAX`] characters.
/// - `id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: PersonName,
    last_name: PersonName,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a user from validated fields.
    pub fn new(id: UserId, draft: UserDraft, created_at: DateTime<Utc>) -> Self {
        let UserDraft {
            first_name,
            last_name,
            role,
        } = draft;
        Self {
            id,
            first_name,
            last_name,
            role,
            created_at,
        }
    }

    /// Rebuild a user read back from a store, re-checking its invariants.
    pub fn restore(
        id: UserId,
        stored: UserInput,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        UserDraft::validate(stored).map(|draft| Self::new(id, draft, created_at))
    }

    /// Replace every mutable field, keeping the identity and creation time.
    #[must_use]
    pub fn replaced(&self, draft: UserDraft) -> Self {
        Self::new(self.id, draft, self.created_at)
    }

    /// Merge a partial update onto this user.
    ///
    /// Fields left out of the patch keep their current value. Clearing a
    /// field is rejected because every user field is required.
    pub fn patched(&self, patch: UserPatch) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let first_name = errors.capture(merge_name("firstName", patch.first_name, &self.first_name));
        let last_name = errors.capture(merge_name("lastName", patch.last_name, &self.last_name));
        let role = errors.capture(match patch.role {
            FieldUpdate::Unchanged => Ok(self.role),
            FieldUpdate::Cleared => Err(FieldViolation::required("role")),
            FieldUpdate::Set(raw) => Role::parse_field(&raw),
        });

        match (first_name, last_name, role) {
            (Some(first_name), Some(last_name), Some(role)) => errors.finish(self.replaced(
                UserDraft {
                    first_name,
                    last_name,
                    role,
                },
            )),
            _ => Err(errors),
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// First name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Platform role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn merge_name(
    field: &'static str,
    update: FieldUpdate<String>,
    current: &PersonName,
) -> Result<PersonName, FieldViolation> {
    match update {
        FieldUpdate::Unchanged => Ok(current.clone()),
        FieldUpdate::Cleared => Err(FieldViolation::required(field)),
        FieldUpdate::Set(raw) => PersonName::parse(field, raw),
    }
}

#[cfg(test)]
mod tests;
