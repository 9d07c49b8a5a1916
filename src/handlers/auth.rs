//! Login handler. The caller supplies an identifier (email, username or
//! phone number) and an already-hashed password; no hashing happens here.

use crate::error::AppError;
use crate::response::LoginBody;
use crate::service::CrudService;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginBody>, AppError> {
    let users = state
        .model
        .table("Users")
        .ok_or_else(|| AppError::Metadata("Users table is not registered".into()))?;
    let user = CrudService::login(
        &state.pool,
        users,
        &state.transforms,
        &req.login,
        &req.password,
    )
    .await?;
    Ok(Json(LoginBody {
        message: "Login successful".into(),
        user,
    }))
}
