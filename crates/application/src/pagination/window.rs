use std::cmp::Ordering;
use std::str::FromStr;

use atrium_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use super::cursor::{CursorKind, CursorValue, compare_ascending};

/// Requested direction of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest key first.
    #[serde(rename = "ASC")]
    Ascending,
    /// Largest key first.
    #[default]
    #[serde(rename = "DESC")]
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Returns the SQL keyword for this direction.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Ascending)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Descending)
        } else {
            Err(AppError::Validation(format!(
                "order must be 'ASC' or 'DESC', got '{value}'"
            )))
        }
    }
}

/// One ordering column of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaginationKey {
    column: &'static str,
    kind: CursorKind,
    nullable: bool,
}

impl PaginationKey {
    /// Creates a non-nullable key.
    #[must_use]
    pub const fn required(column: &'static str, kind: CursorKind) -> Self {
        Self {
            column,
            kind,
            nullable: false,
        }
    }

    /// Creates a key whose column may hold `NULL`.
    #[must_use]
    pub const fn nullable(column: &'static str, kind: CursorKind) -> Self {
        Self {
            column,
            kind,
            nullable: true,
        }
    }

    /// Returns the column name. Repositories use it as a trusted identifier.
    #[must_use]
    pub fn column(&self) -> &'static str {
        self.column
    }

    /// Returns the storage type.
    #[must_use]
    pub fn kind(&self) -> CursorKind {
        self.kind
    }

    /// Returns whether the column may hold `NULL`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// A pagination key with the direction it is fetched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderedKey {
    key: PaginationKey,
    order: SortOrder,
}

impl OrderedKey {
    pub(super) fn new(key: PaginationKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &PaginationKey {
        &self.key
    }

    /// Returns the fetch direction of this key.
    #[must_use]
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Compares two values of this key in fetch order.
    ///
    /// `NULL` is the greatest value, so it comes last ascending and first
    /// descending.
    #[must_use]
    pub fn compare(&self, left: &CursorValue, right: &CursorValue) -> Ordering {
        let ordering = compare_ascending(left, right);
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Rows that expose their ordering key values to the paginator.
pub trait CursorKeyed {
    /// Returns the value of `column`, or `None` when the row has no such column.
    fn cursor_value(&self, column: &str) -> Option<CursorValue>;
}

/// Extracts the key tuple of a row.
pub fn key_tuple<T: CursorKeyed>(row: &T, keys: &[PaginationKey]) -> AppResult<Vec<CursorValue>> {
    keys.iter()
        .map(|key| {
            row.cursor_value(key.column()).ok_or_else(|| {
                AppError::Configuration(format!(
                    "row does not expose pagination key '{}'",
                    key.column()
                ))
            })
        })
        .collect()
}

/// Fetch instruction handed to a repository for one page.
///
/// The repository returns rows strictly after `boundary` in the order of
/// `keys`, sorted by `keys`, and at most `fetch_limit` of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetWindow {
    keys: Vec<OrderedKey>,
    boundary: Option<Vec<CursorValue>>,
    fetch_limit: usize,
}

impl KeysetWindow {
    pub(super) fn new(
        keys: Vec<OrderedKey>,
        boundary: Option<Vec<CursorValue>>,
        fetch_limit: usize,
    ) -> Self {
        Self {
            keys,
            boundary,
            fetch_limit,
        }
    }

    /// Returns the keys in fetch order.
    #[must_use]
    pub fn keys(&self) -> &[OrderedKey] {
        &self.keys
    }

    /// Returns the exclusive lower bound in fetch order, if any.
    #[must_use]
    pub fn boundary(&self) -> Option<&[CursorValue]> {
        self.boundary.as_deref()
    }

    /// Returns the number of rows to fetch.
    #[must_use]
    pub fn fetch_limit(&self) -> usize {
        self.fetch_limit
    }

    /// Compares two key tuples lexicographically in fetch order.
    #[must_use]
    pub fn compare(&self, left: &[CursorValue], right: &[CursorValue]) -> Ordering {
        self.keys
            .iter()
            .zip(left.iter().zip(right))
            .map(|(key, (left, right))| key.compare(left, right))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Returns whether a key tuple lies strictly after the boundary.
    #[must_use]
    pub fn admits(&self, values: &[CursorValue]) -> bool {
        self.boundary
            .as_deref()
            .is_none_or(|boundary| self.compare(values, boundary) == Ordering::Greater)
    }

    /// Evaluates the window against rows held in memory.
    pub fn apply<T: CursorKeyed>(&self, rows: impl IntoIterator<Item = T>) -> AppResult<Vec<T>> {
        let keys: Vec<PaginationKey> = self.keys.iter().map(|key| *key.key()).collect();

        let mut keyed = Vec::new();
        for row in rows {
            let values = key_tuple(&row, &keys)?;
            if self.admits(&values) {
                keyed.push((values, row));
            }
        }

        keyed.sort_by(|(left, _), (right, _)| self.compare(left, right));
        keyed.truncate(self.fetch_limit);

        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }
}
