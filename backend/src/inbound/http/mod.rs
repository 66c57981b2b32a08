//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod issues;
pub mod list_params;
pub mod loaders;
pub mod patch;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use crate::domain::ApiResult;

/// Register the user and issue resources.
///
/// Expects [`state::HttpState`] as app data. Health probes are registered
/// separately because they depend on [`health::HealthState`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use civic_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::list_users)
        .service(users::create_user)
        .service(users::list_user_issues)
        .service(users::get_user)
        .service(users::replace_user)
        .service(users::patch_user)
        .service(users::delete_user)
        .service(issues::list_issues)
        .service(issues::create_issue)
        .service(issues::get_issue)
        .service(issues::patch_issue)
        .service(issues::delete_issue);
}
