pub mod attendance;
pub mod event;
pub mod prize;
pub mod registration;
pub mod report;
pub mod user;

use sqlx::{Postgres, QueryBuilder};

/// Append a case-insensitive search clause over the given columns:
/// ` AND (col1 ILIKE $n OR col2 ILIKE $n ...)`. Shared by every filtered
/// listing so the search contract stays uniform.
pub(crate) fn push_search_filter<'qb>(
    builder: &mut QueryBuilder<'qb, Postgres>,
    columns: &[&str],
    term: &str,
) {
    let pattern = format!("%{}%", term);

    builder.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(*column);
        builder.push(" ILIKE ");
        builder.push_bind(pattern.clone());
    }
    builder.push(")");
}
