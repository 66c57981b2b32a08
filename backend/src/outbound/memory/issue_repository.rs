//! Memory-backed `IssueRepository`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::ports::{IssueRepository, IssueRepositoryError};
use crate::domain::{Issue, IssueFilter, IssueId, UserId, UserIssueCount};

use super::{read, window_of, write};

/// Issues held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryIssueRepository {
    rows: RwLock<HashMap<IssueId, Issue>>,
}

impl MemoryIssueRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(&self, filter: &IssueFilter) -> Result<Vec<Issue>, IssueRepositoryError> {
        let rows = read(&self.rows).map_err(IssueRepositoryError::query)?;
        Ok(rows
            .values()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IssueRepository for MemoryIssueRepository {
    async fn count(&self, filter: &IssueFilter) -> Result<u64, IssueRepositoryError> {
        let rows = read(&self.rows).map_err(IssueRepositoryError::query)?;
        Ok(rows.values().filter(|issue| filter.matches(issue)).count() as u64)
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        window: PageWindow,
    ) -> Result<Vec<Issue>, IssueRepositoryError> {
        let mut issues = self.matching(filter)?;
        // Same ordering as the Postgres adapter, which sorts the status text.
        issues.sort_by(|a, b| filter.order.compare(a, b));
        Ok(window_of(issues, window))
    }

    async fn find_by_id(&self, id: &IssueId) -> Result<Option<Issue>, IssueRepositoryError> {
        let rows = read(&self.rows).map_err(IssueRepositoryError::query)?;
        Ok(rows.get(id).cloned())
    }

    async fn insert(&self, issue: &Issue) -> Result<(), IssueRepositoryError> {
        let mut rows = write(&self.rows).map_err(IssueRepositoryError::query)?;
        rows.insert(*issue.id(), issue.clone());
        Ok(())
    }

    async fn update(&self, issue: &Issue) -> Result<bool, IssueRepositoryError> {
        let mut rows = write(&self.rows).map_err(IssueRepositoryError::query)?;
        match rows.get_mut(issue.id()) {
            Some(slot) => {
                *slot = issue.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &IssueId) -> Result<bool, IssueRepositoryError> {
        let mut rows = write(&self.rows).map_err(IssueRepositoryError::query)?;
        Ok(rows.remove(id).is_some())
    }

    async fn count_by_user(
        &self,
        users: &[UserId],
    ) -> Result<Vec<UserIssueCount>, IssueRepositoryError> {
        let rows = read(&self.rows).map_err(IssueRepositoryError::query)?;
        let mut counts: HashMap<UserId, u64> = HashMap::new();
        for reporter in rows.values().filter_map(Issue::user) {
            if users.contains(reporter) {
                *counts.entry(*reporter).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(user, count)| UserIssueCount::new(user.canonical_key(), count))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the memory issue store.

    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{FieldUpdate, IssueDraft, IssueInput, IssuePatch, IssueStatus, UserParam};

    fn issue(status: &str, user: Option<UserId>, age_minutes: i64) -> Issue {
        let draft = IssueDraft::validate(IssueInput {
            status: Some(status.to_owned()),
            latitude: Some(10.0),
            longitude: Some(20.0),
            tags: Some(vec!["tag".to_owned()]),
            user: user.map(|id| id.to_string()),
            ..IssueInput::default()
        })
        .expect("valid issue");
        Issue::new(
            IssueId::random(),
            draft,
            Utc::now() - Duration::minutes(age_minutes),
        )
    }

    #[fixture]
    fn repo() -> MemoryIssueRepository {
        MemoryIssueRepository::new()
    }

    const EVERYTHING: PageWindow = PageWindow {
        offset: 0,
        limit: 100,
    };

    #[rstest]
    #[tokio::test]
    async fn count_and_list_apply_the_same_filter(repo: MemoryIssueRepository) {
        let alice = UserId::random();
        for row in [
            issue("new", Some(alice), 3),
            issue("completed", Some(alice), 2),
            issue("new", None, 1),
        ] {
            repo.insert(&row).await.expect("insert");
        }
        let filter = IssueFilter::from_params(UserParam::Single(alice.to_string()), Some("new"));

        assert_eq!(repo.count(&filter).await.expect("count"), 1);
        let listed = repo.list(&filter, EVERYTHING).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status(), IssueStatus::New);
    }

    #[rstest]
    #[tokio::test]
    async fn list_orders_by_status_then_age(repo: MemoryIssueRepository) {
        let newer = issue("new", None, 1);
        let older = issue("new", None, 5);
        let done = issue("completed", None, 0);
        for row in [&newer, &older, &done] {
            repo.insert(row).await.expect("insert");
        }

        let listed = repo.list(&IssueFilter::all(), EVERYTHING).await.expect("list");

        let ids: Vec<IssueId> = listed.iter().map(|i| *i.id()).collect();
        assert_eq!(ids, vec![*done.id(), *older.id(), *newer.id()]);
    }

    #[rstest]
    #[tokio::test]
    async fn reporter_listing_orders_by_last_update(repo: MemoryIssueRepository) {
        let alice = UserId::random();
        let touched = issue("completed", Some(alice), 10);
        let touched = touched
            .patched(
                IssuePatch {
                    description: FieldUpdate::Set("Fixed".to_owned()),
                    ..IssuePatch::default()
                },
                Utc::now(),
            )
            .expect("valid patch");
        let idle = issue("new", Some(alice), 5);
        for row in [&touched, &idle] {
            repo.insert(row).await.expect("insert");
        }

        let listed = repo
            .list(&IssueFilter::reported_by(alice), EVERYTHING)
            .await
            .expect("list");

        let ids: Vec<IssueId> = listed.iter().map(|i| *i.id()).collect();
        assert_eq!(ids, vec![*idle.id(), *touched.id()]);
    }

    #[rstest]
    #[tokio::test]
    async fn count_by_user_groups_reporters_in_scope(repo: MemoryIssueRepository) {
        let a = UserId::random();
        let b = UserId::random();
        let outsider = UserId::random();
        for row in [
            issue("new", Some(a), 1),
            issue("new", Some(a), 2),
            issue("new", Some(b), 3),
            issue("new", Some(outsider), 4),
            issue("new", None, 5),
        ] {
            repo.insert(&row).await.expect("insert");
        }

        let mut counts = repo.count_by_user(&[a, b]).await.expect("counts");
        counts.sort_by(|x, y| y.count().cmp(&x.count()));

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].user_key(), a.canonical_key());
        assert_eq!(counts[0].count(), 2);
        assert_eq!(counts[1].count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_only_existing_rows(repo: MemoryIssueRepository) {
        let row = issue("new", None, 0);
        assert!(!repo.update(&row).await.expect("update missing"));
        repo.insert(&row).await.expect("insert");
        assert!(repo.update(&row).await.expect("update existing"));
    }
}
