//! Renders a [`KeysetWindow`] as a PostgreSQL predicate, ordering and limit.
//!
//! `NULL` sorts after every value, matching PostgreSQL's default
//! `ASC NULLS LAST` / `DESC NULLS FIRST`, so the rendered predicate and the
//! in-memory comparison agree.

use atrium_application::pagination::{CursorValue, KeysetWindow, OrderedKey, SortOrder};
use sqlx::{Postgres, QueryBuilder};

/// Appends ` AND (<rows after boundary>)` when the window has a boundary.
pub(crate) fn push_keyset_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    window: &KeysetWindow,
    table_alias: &str,
) {
    let Some(boundary) = window.boundary() else {
        return;
    };

    builder.push(" AND (");
    for (index, (key, value)) in window.keys().iter().zip(boundary).enumerate() {
        if index > 0 {
            builder.push(" OR ");
        }

        builder.push("(");
        for (equal_key, equal_value) in window.keys().iter().zip(boundary).take(index) {
            push_equal(builder, table_alias, equal_key, equal_value);
            builder.push(" AND ");
        }
        push_after(builder, table_alias, key, value);
        builder.push(")");
    }
    builder.push(")");
}

/// Appends ` ORDER BY ... LIMIT $n` for the window.
pub(crate) fn push_keyset_order_and_limit(
    builder: &mut QueryBuilder<'_, Postgres>,
    window: &KeysetWindow,
    table_alias: &str,
) {
    builder.push(" ORDER BY ");
    for (index, key) in window.keys().iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push(column(table_alias, key));
        builder.push(match key.order() {
            SortOrder::Ascending => " ASC NULLS LAST",
            SortOrder::Descending => " DESC NULLS FIRST",
        });
    }

    builder.push(" LIMIT ");
    builder.push_bind(i64::try_from(window.fetch_limit()).unwrap_or(i64::MAX));
}

fn column(table_alias: &str, key: &OrderedKey) -> String {
    format!("{table_alias}.{}", key.key().column())
}

fn push_equal(
    builder: &mut QueryBuilder<'_, Postgres>,
    table_alias: &str,
    key: &OrderedKey,
    value: &CursorValue,
) {
    builder.push(column(table_alias, key));
    if value.is_null() {
        builder.push(" IS NULL");
    } else {
        builder.push(" = ");
        push_value(builder, value);
    }
}

fn push_after(
    builder: &mut QueryBuilder<'_, Postgres>,
    table_alias: &str,
    key: &OrderedKey,
    value: &CursorValue,
) {
    let column = column(table_alias, key);
    let nullable = key.key().is_nullable();

    match (key.order(), value.is_null()) {
        (SortOrder::Ascending, true) => {
            builder.push("FALSE");
        }
        (SortOrder::Ascending, false) => {
            if nullable {
                builder.push(format!("({column} > "));
                push_value(builder, value);
                builder.push(format!(" OR {column} IS NULL)"));
            } else {
                builder.push(format!("{column} > "));
                push_value(builder, value);
            }
        }
        (SortOrder::Descending, true) => {
            builder.push(format!("{column} IS NOT NULL"));
        }
        (SortOrder::Descending, false) => {
            builder.push(format!("{column} < "));
            push_value(builder, value);
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &CursorValue) {
    match value {
        CursorValue::Null => {
            builder.push("NULL");
        }
        CursorValue::Integer(value) => {
            builder.push_bind(*value);
        }
        CursorValue::Text(value) => {
            builder.push_bind(value.clone());
        }
        CursorValue::Uuid(value) => {
            builder.push_bind(*value);
        }
        CursorValue::Timestamp(value) => {
            builder.push_bind(*value);
        }
    }
}

#[cfg(test)]
mod tests {
    use atrium_application::pagination::{
        CursorDirection, CursorKind, CursorPageRequest, CursorPaginator, CursorValue,
        PaginationKey, SortOrder, encode_cursor,
    };
    use sqlx::{Postgres, QueryBuilder};

    use super::{push_keyset_order_and_limit, push_keyset_predicate};

    fn render(keys: Vec<PaginationKey>, request: CursorPageRequest) -> String {
        let paginator =
            CursorPaginator::new(keys, request, 100).unwrap_or_else(|_| unreachable!());
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM items AS t WHERE TRUE");
        push_keyset_predicate(&mut builder, paginator.window(), "t");
        push_keyset_order_and_limit(&mut builder, paginator.window(), "t");
        builder.sql().to_owned()
    }

    #[test]
    fn first_page_has_no_predicate() {
        let sql = render(
            vec![PaginationKey::required("id", CursorKind::Integer)],
            CursorPageRequest {
                limit: 2,
                ..CursorPageRequest::default()
            },
        );

        assert_eq!(
            sql,
            "SELECT * FROM items AS t WHERE TRUE ORDER BY t.id DESC NULLS FIRST LIMIT $1"
        );
    }

    #[test]
    fn composite_keys_expand_lexicographically() {
        let keys = vec![
            PaginationKey::required("created_at", CursorKind::Timestamp),
            PaginationKey::required("id", CursorKind::Uuid),
        ];
        let cursor = encode_cursor(
            &keys,
            CursorDirection::After,
            vec![
                CursorValue::Timestamp(chrono::Utc::now()),
                CursorValue::Uuid(uuid::Uuid::new_v4()),
            ],
        )
        .unwrap_or_else(|_| unreachable!());

        let sql = render(
            keys,
            CursorPageRequest {
                after_cursor: Some(cursor),
                ..CursorPageRequest::default()
            },
        );

        assert_eq!(
            sql,
            "SELECT * FROM items AS t WHERE TRUE AND ((t.created_at < $1) OR \
             (t.created_at = $2 AND t.id < $3)) ORDER BY t.created_at DESC NULLS FIRST, \
             t.id DESC NULLS FIRST LIMIT $4"
        );
    }

    #[test]
    fn backward_page_flips_order_and_comparison() {
        let keys = vec![PaginationKey::required("id", CursorKind::Integer)];
        let cursor = encode_cursor(&keys, CursorDirection::Before, vec![CursorValue::Integer(3)])
            .unwrap_or_else(|_| unreachable!());

        let sql = render(
            keys,
            CursorPageRequest {
                before_cursor: Some(cursor),
                ..CursorPageRequest::default()
            },
        );

        assert_eq!(
            sql,
            "SELECT * FROM items AS t WHERE TRUE AND ((t.id > $1)) \
             ORDER BY t.id ASC NULLS LAST LIMIT $2"
        );
    }

    #[test]
    fn nullable_key_includes_null_rows_after_values_ascending() {
        let keys = vec![
            PaginationKey::nullable("rank", CursorKind::Text),
            PaginationKey::required("id", CursorKind::Integer),
        ];
        let cursor = encode_cursor(
            &keys,
            CursorDirection::After,
            vec![CursorValue::Text("b".to_owned()), CursorValue::Integer(7)],
        )
        .unwrap_or_else(|_| unreachable!());

        let sql = render(
            keys,
            CursorPageRequest {
                order: SortOrder::Ascending,
                after_cursor: Some(cursor),
                ..CursorPageRequest::default()
            },
        );

        assert_eq!(
            sql,
            "SELECT * FROM items AS t WHERE TRUE AND (((t.rank > $1 OR t.rank IS NULL)) OR \
             (t.rank = $2 AND t.id > $3)) ORDER BY t.rank ASC NULLS LAST, \
             t.id ASC NULLS LAST LIMIT $4"
        );
    }

    #[test]
    fn null_boundary_descending_moves_to_values() {
        let keys = vec![
            PaginationKey::nullable("rank", CursorKind::Text),
            PaginationKey::required("id", CursorKind::Integer),
        ];
        let cursor = encode_cursor(
            &keys,
            CursorDirection::After,
            vec![CursorValue::Null, CursorValue::Integer(7)],
        )
        .unwrap_or_else(|_| unreachable!());

        let sql = render(
            keys,
            CursorPageRequest {
                after_cursor: Some(cursor),
                ..CursorPageRequest::default()
            },
        );

        assert_eq!(
            sql,
            "SELECT * FROM items AS t WHERE TRUE AND ((t.rank IS NOT NULL) OR \
             (t.rank IS NULL AND t.id < $1)) ORDER BY t.rank DESC NULLS FIRST, \
             t.id DESC NULLS FIRST LIMIT $2"
        );
    }
}
