//! Issue listing filters built from request parameters.
//!
//! The filter is a plain descriptor. Stores translate it into their own
//! query language, and the same value drives both the count and the page
//! fetch of a listing.

use std::cmp::Ordering;

use super::{Issue, IssueStatus, UserId};

/// Shape in which the `user` query parameter arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserParam {
    /// The parameter was not supplied.
    #[default]
    Absent,
    /// One plain `user=<id>` key.
    Single(String),
    /// Repeated `user=` keys or any `user[]=` key.
    Many(Vec<String>),
}

/// Which reporters an issue listing is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserScope {
    /// No restriction.
    #[default]
    Any,
    /// Issues reported by exactly this user.
    Exact(UserId),
    /// Issues reported by any of these users. An empty list matches nothing.
    AnyOf(Vec<UserId>),
}

impl UserScope {
    /// Whether an issue's reporter falls inside the scope.
    pub fn admits(&self, reporter: Option<&UserId>) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(id) => reporter == Some(id),
            Self::AnyOf(ids) => reporter.is_some_and(|r| ids.contains(r)),
        }
    }
}

/// Which lifecycle states an issue listing is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusScope {
    /// No restriction.
    #[default]
    Any,
    /// Issues in exactly this state.
    Exact(IssueStatus),
    /// A status outside the lifecycle was requested; nothing matches.
    Never,
}

impl StatusScope {
    /// Case-sensitive equality against the lifecycle names.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.filter(|raw| !raw.is_empty()) {
            None => Self::Any,
            Some(raw) => raw.parse::<IssueStatus>().map_or(Self::Never, Self::Exact),
        }
    }

    /// Whether an issue in `status` falls inside the scope.
    pub fn admits(self, status: IssueStatus) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(wanted) => wanted == status,
            Self::Never => false,
        }
    }
}

/// Sort order of an issue listing. Ties always fall back to the id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IssueOrder {
    /// Status name, then creation time. Used by `GET /issues`.
    #[default]
    Status,
    /// Least recently updated first. Used for a reporter's own issues.
    UpdatedAt,
}

impl IssueOrder {
    /// Compare two issues under this order.
    pub fn compare(self, a: &Issue, b: &Issue) -> Ordering {
        let primary = match self {
            Self::Status => a
                .status()
                .as_str()
                .cmp(b.status().as_str())
                .then_with(|| a.created_at().cmp(&b.created_at())),
            Self::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        };
        primary.then_with(|| a.id().cmp(b.id()))
    }
}

/// Filter applied to issue listings.
///
/// # Examples
/// ```
/// use civic_backend::domain::{IssueFilter, IssueStatus, StatusScope, UserParam, UserScope};
///
/// let filter = IssueFilter::from_params(
///     UserParam::Many(vec![
///         "0f8fad5b-d9cb-469f-a165-70867728950e".into(),
///         "not-an-id".into(),
///     ]),
///     Some("inProgress"),
/// );
/// assert!(matches!(filter.user, UserScope::AnyOf(ref ids) if ids.len() == 1));
/// assert_eq!(filter.status, StatusScope::Exact(IssueStatus::InProgress));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub user: UserScope,
    pub status: StatusScope,
    pub order: IssueOrder,
}

impl IssueFilter {
    /// Filter that admits every issue.
    pub fn all() -> Self {
        Self::default()
    }

    /// Issues reported by one user, least recently updated first.
    pub fn reported_by(user: UserId) -> Self {
        Self {
            user: UserScope::Exact(user),
            status: StatusScope::Any,
            order: IssueOrder::UpdatedAt,
        }
    }

    /// Translate the `user` and `status` query parameters.
    ///
    /// Malformed identifiers are dropped from an array and ignored as a
    /// scalar. An empty `status` is treated as absent; any other value outside
    /// the lifecycle matches no issue.
    pub fn from_params(user: UserParam, status: Option<&str>) -> Self {
        let user = match user {
            UserParam::Absent => UserScope::Any,
            UserParam::Single(raw) => UserId::new(raw).map_or(UserScope::Any, UserScope::Exact),
            UserParam::Many(raws) => {
                UserScope::AnyOf(raws.iter().filter_map(|raw| UserId::new(raw).ok()).collect())
            }
        };

        Self {
            user,
            status: StatusScope::from_raw(status),
            order: IssueOrder::Status,
        }
    }

    /// Whether an issue passes the filter.
    pub fn matches(&self, issue: &Issue) -> bool {
        self.user.admits(issue.user()) && self.status.admits(issue.status())
    }
}
