//! Record model built from the catalog: one ordered field list per table,
//! resolved exactly once at startup and held for the process lifetime.
//! A schema change requires a restart; there is no invalidation path.

use crate::error::AppError;
use crate::registry::{TableRegistry, TableSpec};
use crate::schema::introspect;
use crate::schema::types::{map_type, SemanticType};
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::collections::HashMap;

/// One column of a registered table, with its catalog type and the semantic
/// type derived from it.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    /// Store-native type name as reported by the catalog (e.g. "character
    /// varying"); also used as the SQL cast target when binding values.
    pub raw_type: String,
    pub semantic: SemanticType,
}

/// A registered table with its introspected columns, in catalog order.
#[derive(Clone, Debug)]
pub struct ResolvedTable {
    pub spec: TableSpec,
    pub columns: Vec<ColumnSpec>,
}

impl ResolvedTable {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// All resolved tables, in registry order, with name lookup.
#[derive(Clone, Debug)]
pub struct ResolvedModel {
    tables: Vec<ResolvedTable>,
    by_name: HashMap<String, usize>,
}

impl ResolvedModel {
    pub fn table(&self, name: &str) -> Option<&ResolvedTable> {
        self.by_name.get(name).map(|&i| &self.tables[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedTable> {
        self.tables.iter()
    }
}

/// Introspect every registered table and build the model. Called once at
/// startup; a table missing from the catalog is a startup failure.
pub async fn build_model(
    pool: &PgPool,
    registry: &TableRegistry,
) -> Result<ResolvedModel, AppError> {
    let mut tables = Vec::with_capacity(registry.len());
    let mut by_name = HashMap::new();
    for spec in registry.iter() {
        let raw_columns = introspect::columns_for(pool, &spec.name).await?;
        if raw_columns.is_empty() {
            return Err(AppError::Metadata(format!(
                "table {} has no columns in the catalog",
                spec.name
            )));
        }
        let columns = raw_columns
            .into_iter()
            .map(|(name, raw_type)| {
                let semantic = map_type(&raw_type);
                ColumnSpec {
                    name,
                    raw_type,
                    semantic,
                }
            })
            .collect::<Vec<_>>();
        tracing::info!(table = %spec.name, columns = columns.len(), "resolved table model");
        by_name.insert(spec.name.clone(), tables.len());
        tables.push(ResolvedTable {
            spec: spec.clone(),
            columns,
        });
    }
    Ok(ResolvedModel { tables, by_name })
}

/// Shape an inbound payload against the model: keep only fields the table
/// actually has, in catalog order, and silently drop any caller-supplied
/// primary key (the store always assigns it). All fields are optional;
/// unlisted fields are ignored, not rejected.
pub fn shape_body(table: &ResolvedTable, body: &Map<String, Value>) -> Vec<(String, Value)> {
    table
        .columns
        .iter()
        .filter(|c| c.name != table.spec.primary_key_column)
        .filter_map(|c| body.get(&c.name).map(|v| (c.name.clone(), v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn posts_table() -> ResolvedTable {
        ResolvedTable {
            spec: TableSpec::new("Posts", "post_id", true),
            columns: vec![
                ColumnSpec {
                    name: "post_id".into(),
                    raw_type: "integer".into(),
                    semantic: SemanticType::Integer,
                },
                ColumnSpec {
                    name: "user_id".into(),
                    raw_type: "integer".into(),
                    semantic: SemanticType::Integer,
                },
                ColumnSpec {
                    name: "content".into(),
                    raw_type: "text".into(),
                    semantic: SemanticType::Text,
                },
                ColumnSpec {
                    name: "is_deleted".into(),
                    raw_type: "boolean".into(),
                    semantic: SemanticType::Boolean,
                },
            ],
        }
    }

    #[test]
    fn shape_drops_primary_key() {
        let table = posts_table();
        let body = json!({"post_id": 7, "user_id": 1, "content": "hi"});
        let shaped = shape_body(&table, body.as_object().unwrap());
        let names: Vec<&str> = shaped.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["user_id", "content"]);
    }

    #[test]
    fn shape_ignores_unknown_fields() {
        let table = posts_table();
        let body = json!({"content": "hi", "not_a_column": true});
        let shaped = shape_body(&table, body.as_object().unwrap());
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].0, "content");
    }

    #[test]
    fn shape_preserves_catalog_order() {
        let table = posts_table();
        let body = json!({"content": "hi", "user_id": 1});
        let shaped = shape_body(&table, body.as_object().unwrap());
        let names: Vec<&str> = shaped.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["user_id", "content"]);
    }

    #[test]
    fn shape_of_pk_only_body_is_empty() {
        let table = posts_table();
        let body = json!({"post_id": 7});
        let shaped = shape_body(&table, body.as_object().unwrap());
        assert!(shaped.is_empty());
    }
}
