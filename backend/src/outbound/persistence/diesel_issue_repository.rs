//! PostgreSQL-backed `IssueRepository` implementation using Diesel ORM.
//!
//! Filters are translated into a boxed query so the count and the page fetch
//! share one definition.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageWindow;
use uuid::Uuid;

use crate::domain::ports::{IssueRepository, IssueRepositoryError};
use crate::domain::{
    Issue, IssueFilter, IssueId, IssueInput, IssueOrder, StatusScope, UserId, UserIssueCount,
    UserScope,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IssueRow, IssueUpdate, NewIssueRow};
use super::pool::{DbPool, PoolError};
use super::schema::issues;
use super::{to_count, to_sql_bound};

/// Diesel-backed implementation of the issue repository port.
#[derive(Clone)]
pub struct DieselIssueRepository {
    pool: DbPool,
}

impl DieselIssueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IssueRepositoryError {
    map_basic_pool_error(error, IssueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IssueRepositoryError {
    map_basic_diesel_error(
        error,
        IssueRepositoryError::query,
        IssueRepositoryError::connection,
    )
}

fn filtered(filter: &IssueFilter) -> issues::BoxedQuery<'static, Pg> {
    let mut query = issues::table.into_boxed();
    match &filter.user {
        UserScope::Any => {}
        UserScope::Exact(user) => {
            query = query.filter(issues::user_id.eq(*user.as_uuid()));
        }
        UserScope::AnyOf(users) => {
            let ids: Vec<Uuid> = users.iter().map(|user| *user.as_uuid()).collect();
            query = query.filter(issues::user_id.eq_any(ids));
        }
    }
    match filter.status {
        StatusScope::Any => {}
        StatusScope::Exact(status) => {
            query = query.filter(issues::status.eq(status.as_str()));
        }
        StatusScope::Never => {
            query = query.filter(issues::status.eq_any(Vec::<String>::new()));
        }
    }
    query
}

fn ordered(
    query: issues::BoxedQuery<'static, Pg>,
    order: IssueOrder,
) -> issues::BoxedQuery<'static, Pg> {
    match order {
        IssueOrder::Status => query.order((
            issues::status.asc(),
            issues::created_at.asc(),
            issues::id.asc(),
        )),
        IssueOrder::UpdatedAt => query.order((issues::updated_at.asc(), issues::id.asc())),
    }
}

/// Convert a database row into a validated domain issue.
fn row_to_issue(row: IssueRow) -> Result<Issue, IssueRepositoryError> {
    let IssueRow {
        id,
        status,
        description,
        image_url,
        latitude,
        longitude,
        tags,
        created_at,
        updated_at,
        user_id,
    } = row;

    Issue::restore(
        IssueId::from_uuid(id),
        IssueInput {
            status: Some(status),
            description,
            image_url,
            latitude: Some(latitude),
            longitude: Some(longitude),
            tags: Some(tags),
            user: user_id.map(|uuid| uuid.to_string()),
        },
        created_at,
        updated_at,
    )
    .map_err(|err| IssueRepositoryError::query(format!("stored issue {id} is invalid: {err}")))
}

#[async_trait]
impl IssueRepository for DieselIssueRepository {
    async fn count(&self, filter: &IssueFilter) -> Result<u64, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_count(total))
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        window: PageWindow,
    ) -> Result<Vec<Issue>, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IssueRow> = ordered(filtered(filter), filter.order)
            .offset(to_sql_bound(window.offset))
            .limit(to_sql_bound(window.limit))
            .select(IssueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_issue).collect()
    }

    async fn find_by_id(&self, id: &IssueId) -> Result<Option<Issue>, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = issues::table
            .find(id.as_uuid())
            .select(IssueRow::as_select())
            .first::<IssueRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_issue).transpose()
    }

    async fn insert(&self, issue: &Issue) -> Result<(), IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewIssueRow {
            id: *issue.id().as_uuid(),
            status: issue.status().as_str(),
            description: issue.description(),
            image_url: issue.image_url(),
            latitude: issue.latitude(),
            longitude: issue.longitude(),
            tags: issue.tags(),
            created_at: issue.created_at(),
            updated_at: issue.updated_at(),
            user_id: issue.user().map(|user| *user.as_uuid()),
        };

        diesel::insert_into(issues::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, issue: &Issue) -> Result<bool, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = IssueUpdate {
            status: issue.status().as_str(),
            description: issue.description(),
            image_url: issue.image_url(),
            latitude: issue.latitude(),
            longitude: issue.longitude(),
            updated_at: issue.updated_at(),
        };

        diesel::update(issues::table.find(issue.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &IssueId) -> Result<bool, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(issues::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn count_by_user(
        &self,
        users: &[UserId],
    ) -> Result<Vec<UserIssueCount>, IssueRepositoryError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = users.iter().map(|user| *user.as_uuid()).collect();
        let rows: Vec<(Option<Uuid>, i64)> = issues::table
            .filter(issues::user_id.eq_any(ids))
            .group_by(issues::user_id)
            .select((issues::user_id, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(user, count)| {
                user.map(|uuid| UserIssueCount::new(uuid.to_string(), to_count(count)))
            })
            .collect())
    }
}
