//! Pagination combinator for list endpoints.
//!
//! List endpoints return one page of items plus a continuation token. The
//! client drains all pages sequentially and hands callers a single merged
//! response, with the items concatenated in server order under the original
//! key. Endpoints disagree on the request-side token field name (IAM uses
//! `startingToken`, everything else `pageToken`); [`PageSpec`] owns that
//! translation so resource clients and callers never see it.

use serde_json::Value;

use crate::error::Error;

/// Generic request-side continuation token field.
const PAGE_TOKEN: &str = "pageToken";
/// IAM's request-side continuation token field.
const STARTING_TOKEN: &str = "startingToken";
/// Response-side continuation token field.
const NEXT_PAGE_TOKEN: &str = "nextPageToken";

/// Describes how one list endpoint paginates.
///
/// ## Example
///
/// ```rust
/// use cdp_control::PageSpec;
///
/// let generic = PageSpec::new("environments");
/// let iam = PageSpec::iam("groups").with_page_cap(10);
/// ```
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub(crate) items_key: &'static str,
    pub(crate) request_token_field: &'static str,
    pub(crate) response_token_field: &'static str,
    pub(crate) page_cap: Option<u32>,
}

impl PageSpec {
    /// Spec for endpoints using the generic `pageToken`/`nextPageToken` pair.
    pub fn new(items_key: &'static str) -> Self {
        Self {
            items_key,
            request_token_field: PAGE_TOKEN,
            response_token_field: NEXT_PAGE_TOKEN,
            page_cap: None,
        }
    }

    /// Spec for IAM endpoints, which take `startingToken` on the request but
    /// still return `nextPageToken`.
    pub fn iam(items_key: &'static str) -> Self {
        Self {
            request_token_field: STARTING_TOKEN,
            ..Self::new(items_key)
        }
    }

    /// Caps the number of pages fetched.
    #[must_use]
    pub fn with_page_cap(mut self, cap: u32) -> Self {
        self.page_cap = Some(cap);
        self
    }

    /// The key the merged item list lives under.
    pub fn items_key(&self) -> &'static str {
        self.items_key
    }
}

/// Merges a sequence of page responses into one logical response.
///
/// Items are concatenated in the order the pages arrived; no reordering, no
/// deduplication. Non-list fields are taken from the final page, with the
/// continuation token stripped so it never leaks to callers.
pub(crate) fn merge_responses(mut pages: Vec<Value>, spec: &PageSpec) -> Result<Value, Error> {
    let last = pages.pop().ok_or_else(|| spec_missing(spec))?;

    if pages.is_empty() && last.get(spec.items_key).is_none() {
        // Single page without the items key: let the caller's field lookup
        // report the missing key against the untouched response.
        return Ok(strip_token(last, spec));
    }

    let mut merged_items = Vec::new();
    for page in pages.iter().chain(std::iter::once(&last)) {
        if let Some(Value::Array(items)) = page.get(spec.items_key) {
            merged_items.extend(items.iter().cloned());
        }
    }

    let mut result = strip_token(last, spec);
    match result.as_object_mut() {
        Some(map) => {
            map.insert(spec.items_key.to_string(), Value::Array(merged_items));
            Ok(result)
        }
        None => Err(spec_missing(spec)),
    }
}

fn strip_token(mut page: Value, spec: &PageSpec) -> Value {
    if let Some(map) = page.as_object_mut() {
        map.remove(spec.response_token_field);
    }
    page
}

fn spec_missing(spec: &PageSpec) -> Error {
    Error::missing_field(spec.items_key)
}
