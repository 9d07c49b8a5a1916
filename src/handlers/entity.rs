//! Table CRUD handlers: list, get-by-id, create, update, delete. The table
//! path segment is resolved against the startup model; an unregistered
//! table is a 404 before any SQL is built.

use crate::error::AppError;
use crate::response::MessageBody;
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let table = state
        .model
        .table(&table)
        .ok_or_else(|| AppError::NotFound(table.clone()))?;
    let rows = CrudService::list(&state.pool, table, &state.transforms).await?;
    Ok(Json(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path((table, id_str)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let table = state
        .model
        .table(&table)
        .ok_or_else(|| AppError::NotFound(table.clone()))?;
    let id = parse_id(&id_str)?;
    let row = CrudService::get(&state.pool, table, &state.transforms, id).await?;
    Ok(Json(row))
}

pub async fn create(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<MessageBody>, AppError> {
    let table = state
        .model
        .table(&table)
        .ok_or_else(|| AppError::NotFound(table.clone()))?;
    let body = body_to_map(body)?;
    CrudService::create(&state.pool, table, &state.transforms, &body).await?;
    Ok(Json(MessageBody::new("Record inserted successfully")))
}

pub async fn update(
    State(state): State<AppState>,
    Path((table, id_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<MessageBody>, AppError> {
    let table = state
        .model
        .table(&table)
        .ok_or_else(|| AppError::NotFound(table.clone()))?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    CrudService::update(&state.pool, table, &state.transforms, id, &body).await?;
    Ok(Json(MessageBody::new("Record updated successfully")))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((table, id_str)): Path<(String, String)>,
) -> Result<Json<MessageBody>, AppError> {
    let table = state
        .model
        .table(&table)
        .ok_or_else(|| AppError::NotFound(table.clone()))?;
    let id = parse_id(&id_str)?;
    CrudService::delete(&state.pool, table, id).await?;
    Ok(Json(MessageBody::new("Record deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id(""), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(body_to_map(json!({"a": 1})).is_ok());
        assert!(matches!(
            body_to_map(json!([1, 2])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(body_to_map(json!("x")), Err(AppError::BadRequest(_))));
    }
}
