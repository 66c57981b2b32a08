//! In-process repository adapters.
//!
//! Used when no database URL is configured and by the HTTP contract tests.
//! Each repository guards its table with a `std::sync::RwLock`; no lock is
//! held across an `.await`.

mod issue_repository;
mod user_repository;

pub use issue_repository::MemoryIssueRepository;
pub use user_repository::MemoryUserRepository;

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

fn poisoned<T>(_: PoisonError<T>) -> String {
    "memory store lock poisoned".to_owned()
}

fn window_of<T>(rows: Vec<T>, window: pagination::PageWindow) -> Vec<T> {
    let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(offset).take(limit).collect()
}

type ReadResult<'a, T> = Result<RwLockReadGuard<'a, T>, String>;
type WriteResult<'a, T> = Result<RwLockWriteGuard<'a, T>, String>;

fn read<T>(lock: &std::sync::RwLock<T>) -> ReadResult<'_, T> {
    lock.read().map_err(poisoned)
}

fn write<T>(lock: &std::sync::RwLock<T>) -> WriteResult<'_, T> {
    lock.write().map_err(poisoned)
}
