//! Generic CRUD execution against PostgreSQL. Every operation checks one
//! connection out of the pool for the duration of the call and releases it
//! on every exit path (the checkout drops with the call frame). No
//! operation issues more than one write statement, and no retries are
//! attempted; the first store failure is terminal for the request.

use crate::error::AppError;
use crate::schema::{introspect, shape_body, ResolvedModel, ResolvedTable};
use crate::sql::{self, PgBindValue};
use crate::transform::TransformRegistry;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;

/// One catalog column as exposed by the fields endpoint.
#[derive(Serialize, Debug)]
pub struct FieldInfo {
    pub column_name: String,
    pub data_type: String,
}

pub struct CrudService;

impl CrudService {
    /// All rows of the table (minus soft-deleted ones), transforms applied
    /// per row. Unbounded by design: there is no pagination.
    pub async fn list(
        pool: &PgPool,
        table: &ResolvedTable,
        transforms: &TransformRegistry,
    ) -> Result<Vec<Value>, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = sql::select_list(table);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
        Ok(rows
            .iter()
            .map(|r| row_to_json(r, table, transforms))
            .collect())
    }

    /// One row by primary key, or NotFound. Soft-deleted rows are filtered
    /// exactly as in list, so a marked row reads as absent. At-most-one is
    /// the store's primary key invariant, not re-checked here.
    pub async fn get(
        pool: &PgPool,
        table: &ResolvedTable,
        transforms: &TransformRegistry,
        id: i64,
    ) -> Result<Value, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = sql::select_by_id(table);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        match row {
            Some(r) => Ok(row_to_json(&r, table, transforms)),
            None => Err(AppError::NotFound(format!("{} {}", table.spec.name, id))),
        }
    }

    /// Insert one row from a partial payload. Unknown fields are ignored and
    /// a caller-supplied primary key is dropped; an effectively empty
    /// payload is rejected before any statement is issued.
    pub async fn create(
        pool: &PgPool,
        table: &ResolvedTable,
        transforms: &TransformRegistry,
        body: &Map<String, Value>,
    ) -> Result<(), AppError> {
        let shaped = shape_body(table, body);
        if shaped.is_empty() {
            return Err(AppError::Validation("no fields provided for insertion".into()));
        }
        let fields = encode_write_fields(table, transforms, shaped)?;
        let sql::QueryBuf { sql, params } = sql::insert(table, fields);
        let mut conn = pool.acquire().await?;
        tracing::debug!(sql = %sql, "execute");
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        query.execute(&mut *conn).await?;
        Ok(())
    }

    /// Update one row by primary key. Runs unconditionally: updating a
    /// nonexistent id affects zero rows and still reports success, unlike
    /// get. That asymmetry is the documented behavior, not an oversight.
    pub async fn update(
        pool: &PgPool,
        table: &ResolvedTable,
        transforms: &TransformRegistry,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<(), AppError> {
        let shaped = shape_body(table, body);
        if shaped.is_empty() {
            return Err(AppError::Validation("no fields provided for update".into()));
        }
        let fields = encode_write_fields(table, transforms, shaped)?;
        let sql::QueryBuf { sql, params } = sql::update(table, fields, id);
        let mut conn = pool.acquire().await?;
        tracing::debug!(sql = %sql, id, "execute");
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        query.execute(&mut *conn).await?;
        Ok(())
    }

    /// Soft or hard delete per table policy. Zero rows affected still
    /// reports success, same as update.
    pub async fn delete(pool: &PgPool, table: &ResolvedTable, id: i64) -> Result<(), AppError> {
        let mut conn = pool.acquire().await?;
        let sql = sql::delete(table);
        tracing::debug!(sql = %sql, id, "execute");
        sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(())
    }

    /// List every registered table over a single borrowed connection,
    /// sequentially in registry order. The first failing table aborts the
    /// whole aggregate; no partial results are returned.
    pub async fn read_all(
        pool: &PgPool,
        model: &ResolvedModel,
        transforms: &TransformRegistry,
    ) -> Result<Map<String, Value>, AppError> {
        let mut conn = pool.acquire().await?;
        let mut out = Map::new();
        for table in model.iter() {
            let sql = sql::select_list(table);
            tracing::debug!(sql = %sql, "query");
            let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
            let records: Vec<Value> = rows
                .iter()
                .map(|r| row_to_json(r, table, transforms))
                .collect();
            out.insert(table.spec.name.clone(), Value::Array(records));
        }
        Ok(out)
    }

    /// Live catalog lookup for one table's columns, in ordinal order. Does
    /// not consult the memoized model, so it reflects the catalog as-is.
    pub async fn fields(pool: &PgPool, table_name: &str) -> Result<Vec<FieldInfo>, AppError> {
        let mut conn = pool.acquire().await?;
        let columns = introspect::columns_for(&mut *conn, table_name).await?;
        Ok(columns
            .into_iter()
            .map(|(column_name, data_type)| FieldInfo {
                column_name,
                data_type,
            })
            .collect())
    }

    /// Match the identifier (email, username or phone number) and password
    /// hash in one query. Zero matches is a uniform Unauthorized; nothing
    /// distinguishes an unknown identifier from a wrong password. The
    /// matched record is returned with read transforms applied, password
    /// hash included (observed upstream behavior, kept as-is).
    pub async fn login(
        pool: &PgPool,
        users: &ResolvedTable,
        transforms: &TransformRegistry,
        identifier: &str,
        password_hash: &str,
    ) -> Result<Value, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = sql::select_login(users);
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query(&sql)
            .bind(identifier)
            .bind(password_hash)
            .fetch_optional(&mut *conn)
            .await?;
        match row {
            Some(r) => Ok(row_to_json(&r, users, transforms)),
            None => Err(AppError::Unauthorized),
        }
    }
}

/// Convert shaped body fields to bind values, running registered write
/// transforms first (wire base64 to stored bytes). A failed decode is the
/// caller's error, not the store's.
fn encode_write_fields(
    table: &ResolvedTable,
    transforms: &TransformRegistry,
    shaped: Vec<(String, Value)>,
) -> Result<Vec<(String, PgBindValue)>, AppError> {
    let mut out = Vec::with_capacity(shaped.len());
    for (name, value) in shaped {
        let bound = match transforms.find(&table.spec.name, &name) {
            Some(t) => match &value {
                Value::String(s) => PgBindValue::Bytes((t.from_wire)(s).map_err(|_| {
                    AppError::Validation(format!("invalid base64 for {}", name))
                })?),
                // A typed null: the column is binary and the builder casts
                // the placeholder to bytea, which a text null cannot satisfy.
                Value::Null => PgBindValue::NullBytes,
                _ => {
                    return Err(AppError::Validation(format!(
                        "{} must be a base64 string",
                        name
                    )))
                }
            },
            None => PgBindValue::from_json(&value)?,
        };
        out.push((name, bound));
    }
    Ok(out)
}

/// One row as a JSON object, column by column. Binary cells become base64
/// text on the wire; a registered transform takes precedence so absent or
/// empty binary reads as the empty string.
fn row_to_json(
    row: &sqlx::postgres::PgRow,
    table: &ResolvedTable,
    transforms: &TransformRegistry,
) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        if let Some(t) = transforms.find(&table.spec.name, name) {
            if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(name) {
                let bytes = v.unwrap_or_default();
                map.insert(name.to_string(), Value::String((t.to_wire)(&bytes)));
                continue;
            }
        }
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

/// Probe the cell against concrete decodings, narrowest first; anything
/// undecodable falls back to null. Date and time cells render as ISO-like
/// strings without timezone normalization.
fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    if let Ok(v) = row.try_get::<Option<i16>, _>(name) {
        if let Some(n) = v {
            return Value::Number(n.into());
        }
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(name) {
        if let Some(n) = v {
            return Value::Number(n.into());
        }
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(name) {
        if let Some(n) = v {
            return Value::Number(n.into());
        }
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = v {
            if let Some(n) = serde_json::Number::from_f64(n as f64) {
                return Value::Number(n);
            }
        }
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = v {
            if let Some(n) = serde_json::Number::from_f64(n) {
                return Value::Number(n);
            }
        }
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(name) {
        if let Some(b) = v {
            return Value::Bool(b);
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        if let Some(d) = v {
            return Value::String(d.to_rfc3339());
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        if let Some(d) = v {
            return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        if let Some(d) = v {
            return Value::String(d.format("%Y-%m-%d").to_string());
        }
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(name) {
        if let Some(b) = v {
            return Value::String(BASE64.encode(b));
        }
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(name) {
        if let Some(s) = v {
            return Value::String(s);
        }
    }
    if let Ok(v) = row.try_get::<Option<serde_json::Value>, _>(name) {
        if let Some(j) = v {
            return j;
        }
    }
    Value::Null
}
