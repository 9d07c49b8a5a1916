//! Server entry point: builds the immutable table registry, introspects
//! the schema once, and mounts the common and /api routes.

use axum::Router;
use std::sync::Arc;
use tablegate::{
    api_routes, build_model, common_routes_with_ready, default_registry, AppState,
    TransformRegistry,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tablegate=info".parse()?))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/tablegate".into());
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let registry = default_registry();
    let model = build_model(&pool, &registry).await?;
    let state = AppState {
        pool,
        model: Arc::new(model),
        transforms: Arc::new(TransformRegistry::with_defaults()),
    };

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api", api_routes(state));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8003".into());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
