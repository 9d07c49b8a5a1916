//! Column introspection against the store's information schema.

use crate::error::AppError;

/// Fetch `(column_name, data_type)` pairs for one table, ordered by the
/// column's declared ordinal position (catalog order, not alphabetical).
/// Scoped to the current schema so a same-named table elsewhere in a
/// shared database cannot merge its columns into the model. Casts to text
/// so the catalog's identifier domains decode as plain strings.
pub async fn columns_for<'e, E>(
    executor: E,
    table_name: &str,
) -> Result<Vec<(String, String)>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = "SELECT column_name::text, data_type::text \
               FROM information_schema.columns \
               WHERE table_name = $1 AND table_schema = current_schema() \
               ORDER BY ordinal_position";
    tracing::debug!(sql = %sql, table = %table_name, "introspect");
    sqlx::query_as(sql)
        .bind(table_name)
        .fetch_all(executor)
        .await
        .map_err(|e| {
            tracing::error!(table = %table_name, error = %e, "introspection failed");
            AppError::Metadata(format!("columns for {}: {}", table_name, e))
        })
}
