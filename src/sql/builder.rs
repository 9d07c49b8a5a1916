//! Builds SELECT, INSERT, UPDATE and DELETE statements for a resolved table.
//! Values are bound as `$n` placeholders with a cast to the column's catalog
//! type so text and binary bind correctly; identifiers are quoted and come
//! only from the registry and the introspected model.

use crate::schema::ResolvedTable;
use crate::sql::params::PgBindValue;

/// Quote identifier for PostgreSQL (safe: only from the static model).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Placeholder with a cast to the column's catalog type, e.g.
/// `$2::character varying`. The cast target comes from the catalog, so a
/// NULL bound as text still lands in non-text columns.
fn placeholder(table: &ResolvedTable, column: &str, n: usize) -> String {
    match table.column(column) {
        Some(c) => format!("${}::{}", n, c.raw_type),
        None => format!("${}", n),
    }
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

/// Column types the driver has no native decoding for; read them as text
/// so their values survive instead of falling through to null. Timestamps
/// are excluded: they decode natively and render as ISO-like strings.
fn reads_as_text(raw_type: &str) -> bool {
    let t = raw_type.to_lowercase();
    t.contains("numeric")
        || t.contains("decimal")
        || t.contains("money")
        || t == "interval"
        || (t.starts_with("time") && !t.starts_with("timestamp"))
}

/// SELECT list from the resolved model: each column as-is, except types in
/// `reads_as_text`, which are cast to `::text`.
fn select_column_list(table: &ResolvedTable) -> String {
    table
        .columns
        .iter()
        .map(|c| {
            let q = quoted(&c.name);
            if reads_as_text(&c.raw_type) {
                format!("{}::text", q)
            } else {
                q
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT over the table's model columns; soft-delete tables filter out
/// marked rows.
pub fn select_list(table: &ResolvedTable) -> String {
    let cols = select_column_list(table);
    let t = quoted(&table.spec.name);
    if table.spec.soft_delete {
        format!(
            "SELECT {} FROM {} WHERE {} = FALSE",
            cols,
            t,
            quoted("is_deleted")
        )
    } else {
        format!("SELECT {} FROM {}", cols, t)
    }
}

/// List query restricted to one primary key. Caller binds the id as $1.
/// Soft-deleted rows are filtered the same as in the list, so a marked row
/// reads as absent.
pub fn select_by_id(table: &ResolvedTable) -> String {
    let pk = quoted(&table.spec.primary_key_column);
    let base = select_list(table);
    if table.spec.soft_delete {
        format!("{} AND {} = $1", base, pk)
    } else {
        format!("{} WHERE {} = $1", base, pk)
    }
}

/// INSERT of exactly the shaped fields; omitted fields are omitted, not
/// NULLed, so store defaults apply.
pub fn insert(table: &ResolvedTable, fields: Vec<(String, PgBindValue)>) -> QueryBuf {
    let mut cols = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());
    for (i, (name, value)) in fields.into_iter().enumerate() {
        placeholders.push(placeholder(table, &name, i + 1));
        cols.push(quoted(&name));
        params.push(value);
    }
    QueryBuf {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quoted(&table.spec.name),
            cols.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

/// UPDATE of the shaped fields by primary key. Executes unconditionally;
/// zero rows affected is not distinguished here.
pub fn update(table: &ResolvedTable, fields: Vec<(String, PgBindValue)>, id: i64) -> QueryBuf {
    let mut sets = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len() + 1);
    for (i, (name, value)) in fields.into_iter().enumerate() {
        let ph = placeholder(table, &name, i + 1);
        sets.push(format!("{} = {}", quoted(&name), ph));
        params.push(value);
    }
    let id_param = params.len() + 1;
    params.push(PgBindValue::I64(id));
    QueryBuf {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            quoted(&table.spec.name),
            sets.join(", "),
            quoted(&table.spec.primary_key_column),
            id_param
        ),
        params,
    }
}

/// Soft delete marks the row; hard delete removes it. Caller binds the id
/// as $1. Neither form verifies prior existence.
pub fn delete(table: &ResolvedTable) -> String {
    let t = quoted(&table.spec.name);
    let pk = quoted(&table.spec.primary_key_column);
    if table.spec.soft_delete {
        format!(
            "UPDATE {} SET {} = TRUE WHERE {} = $1",
            t,
            quoted("is_deleted"),
            pk
        )
    } else {
        format!("DELETE FROM {} WHERE {} = $1", t, pk)
    }
}

/// Credential match over the users table: the identifier may be an email,
/// username or phone number; the password hash is compared by equality.
/// One query, so an unknown identifier and a wrong password are
/// indistinguishable. Caller binds identifier as $1 and hash as $2.
pub fn select_login(users: &ResolvedTable) -> String {
    format!(
        "SELECT {} FROM {} WHERE ({} = $1 OR {} = $1 OR {} = $1) AND {} = $2 AND {} = FALSE",
        select_column_list(users),
        quoted(&users.spec.name),
        quoted("email"),
        quoted("username"),
        quoted("phone_number"),
        quoted("password_hash"),
        quoted("is_deleted")
    )
}
