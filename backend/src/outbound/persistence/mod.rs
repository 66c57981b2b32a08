//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Rows are re-validated through the domain constructors on the way
//! out, so a corrupt record surfaces as a query error rather than a panic.
//!
//! # Example
//!
//! ```ignore
//! use civic_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/civic")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_issue_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_issue_repository::DieselIssueRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Clamp a page bound into the signed range SQL `OFFSET`/`LIMIT` accept.
fn to_sql_bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Convert a SQL count into the unsigned totals the ports report.
fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0)]
    #[case(25, 25)]
    #[case(u64::MAX, i64::MAX)]
    fn sql_bounds_saturate(#[case] value: u64, #[case] expected: i64) {
        assert_eq!(to_sql_bound(value), expected);
    }

    #[rstest]
    fn negative_counts_floor_at_zero() {
        assert_eq!(to_count(-1), 0);
        assert_eq!(to_count(7), 7);
    }
}
