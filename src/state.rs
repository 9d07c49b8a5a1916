//! Shared application state for all routes. Everything here is built once
//! at startup and immutable afterwards; requests share nothing else.

use crate::schema::ResolvedModel;
use crate::transform::TransformRegistry;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub model: Arc<ResolvedModel>,
    pub transforms: Arc<TransformRegistry>,
}
