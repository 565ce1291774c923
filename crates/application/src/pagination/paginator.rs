use std::collections::HashSet;
use std::future::Future;

use atrium_core::{AppError, AppResult};

use super::cursor::{CursorDirection, decode_cursor, encode_cursor};
use super::window::{CursorKeyed, KeysetWindow, OrderedKey, PaginationKey, SortOrder, key_tuple};

/// Default upper bound for a page size.
pub const DEFAULT_MAX_PAGE_LIMIT: usize = 100;

/// Largest maximum page size a deployment may configure.
pub const PAGE_LIMIT_CEILING: usize = 1_000;

/// Default page size when a caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Caller-supplied paging parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPageRequest {
    /// Requested page size; clamped to the paginator maximum.
    pub limit: usize,
    /// Listing direction applied to every key.
    pub order: SortOrder,
    /// Continue after the row this cursor encodes.
    pub after_cursor: Option<String>,
    /// Continue before the row this cursor encodes.
    pub before_cursor: Option<String>,
}

impl Default for CursorPageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            order: SortOrder::default(),
            after_cursor: None,
            before_cursor: None,
        }
    }
}

/// Continuation tokens returned with a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Fetches the rows after the last row of this page.
    pub after_cursor: Option<String>,
    /// Fetches the rows before the first row of this page.
    pub before_cursor: Option<String>,
}

/// One page of rows in the requested order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    /// Page rows.
    pub data: Vec<T>,
    /// Continuation tokens.
    pub cursor: PageCursor,
}

impl<T> CursorPage<T> {
    /// Maps page rows while keeping the cursors.
    #[must_use]
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            data: self.data.into_iter().map(transform).collect(),
            cursor: self.cursor,
        }
    }
}

/// Keyset paginator for one listing request.
///
/// Construction validates the key set and the request. The repository
/// evaluates [`CursorPaginator::window`] and hands the rows back to
/// [`CursorPaginator::finish`].
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    keys: Vec<PaginationKey>,
    limit: usize,
    backward: bool,
    after_supplied: bool,
    window: KeysetWindow,
}

impl CursorPaginator {
    /// Creates a paginator from ordering keys and a request.
    pub fn new(
        keys: Vec<PaginationKey>,
        request: CursorPageRequest,
        max_limit: usize,
    ) -> AppResult<Self> {
        validate_keys(&keys)?;

        if max_limit == 0 {
            return Err(AppError::Configuration(
                "pagination max limit must be positive".to_owned(),
            ));
        }

        if request.limit == 0 {
            return Err(AppError::Validation(
                "limit must be a positive integer".to_owned(),
            ));
        }

        let after_cursor = non_blank(request.after_cursor);
        let before_cursor = non_blank(request.before_cursor);

        let (boundary, backward) = match (after_cursor, before_cursor) {
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "afterCursor and beforeCursor cannot be combined".to_owned(),
                ));
            }
            (Some(after), None) => (
                Some(decode_cursor(&after, &keys, CursorDirection::After)?),
                false,
            ),
            (None, Some(before)) => (
                Some(decode_cursor(&before, &keys, CursorDirection::Before)?),
                true,
            ),
            (None, None) => (None, false),
        };

        let after_supplied = boundary.is_some() && !backward;
        let limit = request.limit.min(max_limit);
        let fetch_order = if backward {
            request.order.reversed()
        } else {
            request.order
        };

        let window = KeysetWindow::new(
            keys.iter()
                .map(|key| OrderedKey::new(*key, fetch_order))
                .collect(),
            boundary,
            limit.saturating_add(1),
        );

        Ok(Self {
            keys,
            limit,
            backward,
            after_supplied,
            window,
        })
    }

    /// Returns the fetch instruction for the repository.
    #[must_use]
    pub fn window(&self) -> &KeysetWindow {
        &self.window
    }

    /// Returns the effective page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Assembles a page from rows fetched for [`CursorPaginator::window`].
    pub fn finish<T: CursorKeyed>(&self, mut rows: Vec<T>) -> AppResult<CursorPage<T>> {
        let has_more = rows.len() > self.limit;
        rows.truncate(self.limit);

        if self.backward {
            rows.reverse();
        }

        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Ok(CursorPage {
                data: rows,
                cursor: PageCursor::default(),
            });
        };

        let after_cursor = if self.backward || has_more {
            Some(encode_cursor(
                &self.keys,
                CursorDirection::After,
                key_tuple(last, &self.keys)?,
            )?)
        } else {
            None
        };

        let before_cursor = if self.after_supplied || (self.backward && has_more) {
            Some(encode_cursor(
                &self.keys,
                CursorDirection::Before,
                key_tuple(first, &self.keys)?,
            )?)
        } else {
            None
        };

        tracing::debug!(
            rows = rows.len(),
            has_more,
            backward = self.backward,
            "assembled cursor page"
        );

        Ok(CursorPage {
            data: rows,
            cursor: PageCursor {
                after_cursor,
                before_cursor,
            },
        })
    }

    /// Runs `fetch` against the window and assembles the page.
    pub async fn paginate<T, F, Fut>(&self, fetch: F) -> AppResult<CursorPage<T>>
    where
        T: CursorKeyed,
        F: FnOnce(KeysetWindow) -> Fut,
        Fut: Future<Output = AppResult<Vec<T>>>,
    {
        let rows = fetch(self.window.clone()).await?;
        self.finish(rows)
    }
}

fn validate_keys(keys: &[PaginationKey]) -> AppResult<()> {
    let Some(last) = keys.last() else {
        return Err(AppError::Configuration(
            "cursor pagination requires at least one ordering key".to_owned(),
        ));
    };

    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.column()) {
            return Err(AppError::Configuration(format!(
                "pagination key '{}' is listed more than once",
                key.column()
            )));
        }
    }

    if last.is_nullable() {
        return Err(AppError::Configuration(format!(
            "final pagination key '{}' must be unique and non-nullable",
            last.column()
        )));
    }

    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
