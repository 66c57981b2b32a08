//! Navigation links and `Link` header rendering.

use std::fmt;

use url::Url;

use crate::request::PageRequest;

/// Errors raised while preparing link targets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The configured base URL could not be parsed.
    #[error("invalid base URL `{url}`: {message}")]
    InvalidBaseUrl {
        /// Raw base URL as configured.
        url: String,
        /// Parser failure description.
        message: String,
    },
    /// The base URL has no hierarchical path to extend (for example `mailto:`).
    #[error("base URL `{url}` cannot carry a resource path")]
    NotHierarchical {
        /// Raw base URL as configured.
        url: String,
    },
}

/// Join a configured base URL and a resource path.
///
/// Any path already present on the base is kept as a prefix, so a base of
/// `http://host/api` and a path of `/issues` yield `http://host/api/issues`.
///
/// # Errors
/// Returns [`PaginationError`] when the base does not parse or cannot carry a
/// path.
///
/// # Examples
/// ```
/// use pagination::resource_url;
///
/// let url = resource_url("http://localhost:8080/", "/users").expect("valid base");
/// assert_eq!(url.as_str(), "http://localhost:8080/users");
/// ```
pub fn resource_url(base: &str, path: &str) -> Result<Url, PaginationError> {
    let mut url = Url::parse(base).map_err(|err| PaginationError::InvalidBaseUrl {
        url: base.to_owned(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(PaginationError::NotHierarchical {
            url: base.to_owned(),
        });
    }
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Relation type of a navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkRelation {
    /// The first page.
    First,
    /// The page before the current one.
    Prev,
    /// The page after the current one.
    Next,
    /// The last page.
    Last,
}

impl LinkRelation {
    /// Registered relation name used in the `rel` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    relation: LinkRelation,
    page: u64,
    url: Url,
}

impl PageLink {
    fn new(resource: &Url, relation: LinkRelation, page: u64, page_size: u64) -> Self {
        let mut url = resource.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Self {
            relation,
            page,
            url,
        }
    }

    /// Relation of this link to the current page.
    #[must_use]
    pub const fn relation(&self) -> LinkRelation {
        self.relation
    }

    /// Page number the link points to.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Absolute link target.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>; rel=\"{}\"", self.url, self.relation)
    }
}

/// Ordered set of applicable navigation links for one page.
///
/// `first` and `prev` are present unless the request is for page 1; `next`
/// and `last` are present while the page is before `maxPage`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationLinks {
    links: Vec<PageLink>,
}

impl NavigationLinks {
    /// Compute the links for `request` over a collection of `total` records.
    #[must_use]
    pub fn build(resource: &Url, request: PageRequest, total: u64) -> Self {
        let page = request.page();
        let page_size = request.page_size();
        let max_page = request.max_page(total);
        let mut links = Vec::with_capacity(4);

        if page > 1 {
            links.push(PageLink::new(resource, LinkRelation::First, 1, page_size));
            links.push(PageLink::new(
                resource,
                LinkRelation::Prev,
                page.saturating_sub(1),
                page_size,
            ));
        }
        if page < max_page {
            links.push(PageLink::new(
                resource,
                LinkRelation::Next,
                page.saturating_add(1),
                page_size,
            ));
            links.push(PageLink::new(
                resource,
                LinkRelation::Last,
                max_page,
                page_size,
            ));
        }

        Self { links }
    }

    /// Whether no link applies (single-page result).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of applicable links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Look up the link for a relation.
    #[must_use]
    pub fn get(&self, relation: LinkRelation) -> Option<&PageLink> {
        self.links.iter().find(|link| link.relation == relation)
    }

    /// Iterate over the links in header order.
    pub fn iter(&self) -> impl Iterator<Item = &PageLink> {
        self.links.iter()
    }

    /// Render the `Link` header value, or `None` when no link applies.
    ///
    /// # Examples
    /// ```
    /// use pagination::{NavigationLinks, PageRequest, resource_url};
    ///
    /// let resource = resource_url("http://localhost:8080", "/issues").expect("valid base");
    /// let links = NavigationLinks::build(&resource, PageRequest::new(1, 100), 150);
    /// assert_eq!(
    ///     links.header_value().as_deref(),
    ///     Some(
    ///         "<http://localhost:8080/issues?page=2&pageSize=100>; rel=\"next\", \
    ///          <http://localhost:8080/issues?page=2&pageSize=100>; rel=\"last\""
    ///     )
    /// );
    /// ```
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.links.is_empty() {
            return None;
        }
        let rendered: Vec<String> = self.links.iter().map(ToString::to_string).collect();
        Some(rendered.join(", "))
    }
}
