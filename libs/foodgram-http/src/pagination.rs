//! Page-number pagination with a `{count, next, previous, results}` envelope.

use axum::http::Uri;
use foodgram_errors::{Problem, problems};
use serde::{Deserialize, Serialize};
use url::Url;

/// Raw `?page=&limit=` query values.
///
/// Kept as strings: a malformed `limit` falls back to the default size and a
/// malformed `page` is reported as an invalid page, not as a query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Page size policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub default_size: u64,
    pub max_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            default_size: 10,
            max_size: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub size: u64,
}

fn invalid_page() -> Problem {
    problems::not_found("Invalid page.").with_code("INVALID_PAGE")
}

impl PageRequest {
    /// Resolve query values against the size policy.
    ///
    /// # Errors
    /// Returns a 404 problem when `page` is not a positive integer or its
    /// offset overflows.
    pub fn resolve(params: &PageParams, policy: Pagination) -> Result<Self, Problem> {
        let page = match params.page.as_deref() {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(invalid_page()),
            },
        };

        let size = params
            .limit
            .as_deref()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|n| *n >= 1)
            .map_or(policy.default_size, |n| n.min(policy.max_size));

        // Offsets are bound as signed 64-bit integers.
        let fits = (page - 1)
            .checked_mul(size)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !fits {
            return Err(invalid_page());
        }

        Ok(Self { page, size })
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Pages past the end are an error, except the first page of an empty set.
    ///
    /// # Errors
    /// Returns a 404 problem for an out-of-range page.
    pub fn ensure_in_range(&self, count: u64) -> Result<(), Problem> {
        if self.page > 1 && self.offset() >= count {
            return Err(invalid_page());
        }
        Ok(())
    }

    fn has_next(&self, count: u64) -> bool {
        self.offset().saturating_add(self.size) < count
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page; links are omitted when `request_url` is unknown.
    pub fn new(results: Vec<T>, count: u64, req: PageRequest, request_url: Option<&Url>) -> Self {
        let next = request_url
            .filter(|_| req.has_next(count))
            .map(|u| with_page(u, req.page + 1));
        let previous = request_url
            .filter(|_| req.page > 1)
            .map(|u| with_page(u, req.page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Absolute URL of the current request under the public base.
#[must_use]
pub fn request_url(base: &Url, uri: &Uri) -> Option<Url> {
    let mut url = base.join(uri.path().trim_start_matches('/')).ok()?;
    url.set_query(uri.query());
    Some(url)
}

/// Same URL with `page` replaced; page 1 drops the parameter.
fn with_page(url: &Url, page: u64) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut out = url.clone();
    out.set_query(None);
    if !kept.is_empty() || page > 1 {
        let mut pairs = out.query_pairs_mut();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        if page > 1 {
            pairs.append_pair("page", &page.to_string());
        }
    }
    out.into()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_owned),
            limit: limit.map(str::to_owned),
        }
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        let req = PageRequest::resolve(&PageParams::default(), Pagination::default()).unwrap();
        assert_eq!(req, PageRequest { page: 1, size: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn limit_is_clamped_and_lenient() {
        let policy = Pagination::default();
        assert_eq!(PageRequest::resolve(&params(None, Some("6")), policy).unwrap().size, 6);
        assert_eq!(PageRequest::resolve(&params(None, Some("500")), policy).unwrap().size, 100);
        assert_eq!(PageRequest::resolve(&params(None, Some("abc")), policy).unwrap().size, 10);
        assert_eq!(PageRequest::resolve(&params(None, Some("0")), policy).unwrap().size, 10);
    }

    #[test]
    fn malformed_page_is_not_found() {
        let policy = Pagination::default();
        for bad in ["0", "-1", "x"] {
            let err = PageRequest::resolve(&params(Some(bad), None), policy).unwrap_err();
            assert_eq!(err.status.as_u16(), 404);
        }
    }

    #[test]
    fn huge_page_is_not_found() {
        let policy = Pagination::default();
        for huge in ["1000000000000000000", "18446744073709551615"] {
            let err = PageRequest::resolve(&params(Some(huge), Some("100")), policy).unwrap_err();
            assert_eq!(err.status.as_u16(), 404);
            assert_eq!(err.code, "INVALID_PAGE");
        }
        // Largest page whose offset still fits.
        let max = (u64::try_from(i64::MAX).unwrap() / 10 + 1).to_string();
        let req = PageRequest::resolve(&params(Some(&max), None), policy).unwrap();
        assert!(i64::try_from(req.offset()).is_ok());
    }

    #[test]
    fn out_of_range_page() {
        let req = PageRequest { page: 3, size: 10 };
        assert!(req.ensure_in_range(20).is_err());
        assert!(req.ensure_in_range(21).is_ok());
        assert!(PageRequest { page: 1, size: 10 }.ensure_in_range(0).is_ok());
    }

    #[test]
    fn links_keep_other_params() {
        let base = Url::parse("http://localhost:8087/").unwrap();
        let uri: Uri = "/api/recipes/?author=3&page=2&limit=2".parse().unwrap();
        let url = request_url(&base, &uri).unwrap();

        let page = Page::new(vec![1, 2], 7, PageRequest { page: 2, size: 2 }, Some(&url));
        assert_eq!(page.count, 7);
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8087/api/recipes/?author=3&limit=2&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://localhost:8087/api/recipes/?author=3&limit=2")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let base = Url::parse("http://localhost:8087/").unwrap();
        let uri: Uri = "/api/users/".parse().unwrap();
        let url = request_url(&base, &uri).unwrap();

        let page = Page::new(vec!["a"], 1, PageRequest { page: 1, size: 10 }, Some(&url));
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert_eq!(page.map_items(str::len).results, vec![1]);
    }
}
