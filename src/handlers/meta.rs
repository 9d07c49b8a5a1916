//! Aggregate and catalog endpoints: all-data fan-out and per-table fields.

use crate::error::AppError;
use crate::service::{CrudService, FieldInfo};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

/// Every registered table's (filtered) rows keyed by table name. A failure
/// on any table fails the whole response.
pub async fn all_data(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let data = CrudService::read_all(&state.pool, &state.model, &state.transforms).await?;
    Ok(Json(Value::Object(data)))
}

/// Column names and raw catalog types for one registered table. Unknown
/// table names are a client error, matching the original surface.
pub async fn fields(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Vec<FieldInfo>>, AppError> {
    if state.model.table(&table).is_none() {
        return Err(AppError::BadRequest("invalid table name".into()));
    }
    let columns = CrudService::fields(&state.pool, &table).await?;
    Ok(Json(columns))
}
