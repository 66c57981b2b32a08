//! Query-string parsing and `Link` header rendering for collection endpoints.
//!
//! The `user` filter accepts both repeated keys (`user=a&user=b`) and the
//! bracketed array form (`user[]=a`), which `serde_urlencoded` cannot express,
//! so the query string is decoded into raw pairs here.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use pagination::{NavigationLinks, PageRequest, resource_url};
use serde::Serialize;
use tracing::error;

use crate::domain::{Error, IssueFilter, UserParam};

/// Decoded query parameters of a list request.
///
/// # Examples
/// ```
/// use civic_backend::domain::UserParam;
/// use civic_backend::inbound::http::list_params::ListParams;
///
/// let params = ListParams::parse("user[]=a&user[]=b&page=2");
/// assert_eq!(params.page().page(), 2);
/// assert_eq!(
///     params.user_param(),
///     UserParam::Many(vec!["a".to_owned(), "b".to_owned()])
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

fn is_array_key(key: &str) -> bool {
    key.strip_prefix("user[")
        .is_some_and(|rest| rest.ends_with(']'))
}

impl ListParams {
    /// Decode a raw query string.
    pub fn parse(query: &str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value supplied for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Normalized page request from `page` and `pageSize`.
    pub fn page(&self) -> PageRequest {
        PageRequest::from_raw(self.first("page"), self.first("pageSize"))
    }

    /// Shape of the `user` parameter: absent, one scalar, or an array.
    pub fn user_param(&self) -> UserParam {
        let mut scalars = Vec::new();
        let mut bracketed = false;
        for (key, value) in &self.pairs {
            if key == "user" {
                scalars.push(value.clone());
            } else if is_array_key(key) {
                bracketed = true;
                scalars.push(value.clone());
            }
        }

        match scalars.len() {
            0 => UserParam::Absent,
            1 if !bracketed => scalars
                .pop()
                .map_or(UserParam::Absent, UserParam::Single),
            _ => UserParam::Many(scalars),
        }
    }

    /// Build the issue filter from `user` and `status`.
    pub fn issue_filter(&self) -> IssueFilter {
        IssueFilter::from_params(self.user_param(), self.first("status"))
    }
}

impl FromRequest for ListParams {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::parse(req.query_string())))
    }
}

/// Respond with a page of records and, when applicable, a `Link` header.
pub fn paginated<T: Serialize>(
    base_url: &str,
    path: &str,
    page: PageRequest,
    total: u64,
    body: &T,
) -> Result<HttpResponse, Error> {
    let resource = resource_url(base_url, path).map_err(|err| {
        error!(error = %err, "public base URL cannot build pagination links");
        Error::internal(err.to_string())
    })?;

    let mut response = HttpResponse::Ok();
    if let Some(value) = NavigationLinks::build(&resource, page, total).header_value() {
        response.insert_header((header::LINK, value));
    }
    Ok(response.json(body))
}
