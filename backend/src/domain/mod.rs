//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities used by the API and the
//! stores, and the services implementing the driving ports. Types are
//! immutable once validated; constructors collect field-level violations.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User / Issue: validated entities with their ids, drafts and patches.
//! - IssueFilter: listing filter built from request parameters.
//! - attach_issue_counts: joins per-user issue counts onto a user page.
//! - UsersService / IssuesService: driving port implementations.

pub mod error;
pub mod issue;
pub mod issue_counts;
pub mod issue_filter;
pub mod issues_service;
pub mod ports;
pub mod record_id;
pub mod trace_id;
pub mod user;
pub mod users_service;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::issue::{
    Issue, IssueDraft, IssueId, IssueInput, IssuePatch, IssueStatus, UnknownStatus,
};
pub use self::issue_counts::{UserIssueCount, UserWithIssueCount, attach_issue_counts};
pub use self::issue_filter::{IssueFilter, IssueOrder, StatusScope, UserParam, UserScope};
pub use self::issues_service::{IssuesService, issue_not_found};
pub use self::record_id::{InvalidRecordId, canonical_key};
pub use self::trace_id::TraceId;
pub use self::user::{PersonName, Role, UnknownRole, User, UserDraft, UserId, UserInput, UserPatch};
pub use self::users_service::{UsersService, user_not_found};
pub use self::validation::{FieldUpdate, FieldViolation, ValidationErrors};

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use civic_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("No issue found with ID 42"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
