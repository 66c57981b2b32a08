//! Per-user issue counts joined onto user listings.

use std::collections::HashMap;

use super::User;
use super::record_id::canonical_key;

/// Number of issues reported by one user, as returned by a grouped count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIssueCount {
    user_key: String,
    count: u64,
}

impl UserIssueCount {
    /// Build a count row; the key is normalised to its canonical form.
    pub fn new(user_key: impl AsRef<str>, count: u64) -> Self {
        Self {
            user_key: canonical_key(user_key.as_ref()),
            count,
        }
    }

    /// Canonical reporter key.
    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// Number of issues.
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// A user together with the number of issues they reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithIssueCount {
    pub user: User,
    pub reported_issue_count: u64,
}

/// Attach issue counts to a page of users, keeping the page order.
///
/// Users missing from `counts` reported nothing and get `0`. Rows for users
/// outside the page are ignored.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use civic_backend::domain::{
///     User, UserDraft, UserId, UserInput, UserIssueCount, attach_issue_counts,
/// };
///
/// let draft = UserDraft::validate(UserInput {
///     first_name: Some("Ada".into()),
///     last_name: Some("Byron".into()),
///     role: Some("citizen".into()),
/// })
/// .expect("valid user");
/// let user = User::new(UserId::random(), draft, Utc::now());
/// let key = user.id().to_string().to_uppercase();
///
/// let listed = attach_issue_counts(vec![user], &[UserIssueCount::new(key, 3)]);
/// assert_eq!(listed[0].reported_issue_count, 3);
/// ```
pub fn attach_issue_counts(users: Vec<User>, counts: &[UserIssueCount]) -> Vec<UserWithIssueCount> {
    let mut by_key: HashMap<&str, u64> = HashMap::with_capacity(counts.len());
    for row in counts {
        *by_key.entry(row.user_key()).or_default() += row.count();
    }

    users
        .into_iter()
        .map(|user| {
            let reported_issue_count = by_key
                .get(user.id().canonical_key().as_str())
                .copied()
                .unwrap_or(0);
            UserWithIssueCount {
                user,
                reported_issue_count,
            }
        })
        .collect()
}
