//! Page-number pagination primitives for collection endpoints.
//!
//! The crate normalizes raw `page`/`pageSize` query values into a
//! [`PageRequest`], turns that request into an offset/limit [`PageWindow`]
//! for the store, and derives the `first`/`prev`/`next`/`last`
//! [`NavigationLinks`] rendered into a single RFC 8288 `Link` header.
//!
//! Counting and fetching are separate reads performed by the caller, so the
//! total used to compute `maxPage` may drift from the fetched page when writes
//! land in between. The crate does not attempt to hide that window.
//!
//! # Examples
//!
//! ```
//! use pagination::{NavigationLinks, PageRequest, resource_url};
//!
//! let request = PageRequest::from_raw(Some("2"), Some("100"));
//! let resource = resource_url("http://localhost:8080", "/issues").expect("valid base");
//! let links = NavigationLinks::build(&resource, request, 250);
//!
//! assert_eq!(request.window().offset, 100);
//! assert_eq!(links.len(), 4);
//! ```

mod links;
mod request;

pub use links::{LinkRelation, NavigationLinks, PageLink, PaginationError, resource_url};
pub use request::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageWindow};
