//! The /api route family. Static segments (all-data, fields, login) are
//! registered alongside the dynamic table capture; the router prefers
//! static matches, so they never shadow a table of the same shape.

use crate::handlers::auth::login;
use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::handlers::meta::{all_data, fields};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/all-data", get(all_data))
        .route("/fields/:table", get(fields))
        .route("/login", post(login))
        .route("/:table", get(list).post(create))
        .route("/:table/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}
