//! Keyset (cursor) pagination over an ordered key set.
//!
//! A listing is ordered by one or more keys whose final key is unique. The
//! request order applies to every key. Cursors are opaque base64url tokens
//! that carry the key columns, the slot they were issued for and the key
//! values of the boundary row.

mod cursor;
mod paginator;
mod window;


pub use cursor::{CursorDirection, CursorKind, CursorValue, decode_cursor, encode_cursor};
pub use paginator::{
    CursorPage, CursorPageRequest, CursorPaginator, DEFAULT_MAX_PAGE_LIMIT, DEFAULT_PAGE_LIMIT,
    PAGE_LIMIT_CEILING, PageCursor,
};
pub use window::{CursorKeyed, KeysetWindow, OrderedKey, PaginationKey, SortOrder, key_tuple};

/// Page size bound shared by the services of one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    /// Largest page a caller may request.
    pub max_limit: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl PaginationSettings {
    /// Creates a paginator bounded by these settings.
    pub fn paginator(
        &self,
        keys: Vec<PaginationKey>,
        request: CursorPageRequest,
    ) -> atrium_core::AppResult<CursorPaginator> {
        CursorPaginator::new(keys, request, self.max_limit)
    }
}
