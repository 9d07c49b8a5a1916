//! Tablegate: a schema-driven CRUD REST facade over a fixed set of
//! PostgreSQL tables. At startup each registered table's columns are
//! introspected from the information schema and turned into a record
//! model; the same handlers then serve list/get/create/update/delete for
//! every table, plus login, an all-tables aggregate, and a fields endpoint.

pub mod error;
pub mod handlers;
pub mod registry;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod transform;

pub use error::AppError;
pub use registry::{default_registry, TableRegistry, TableSpec};
pub use routes::{api_routes, common_routes, common_routes_with_ready};
pub use schema::{build_model, map_type, ResolvedModel, ResolvedTable, SemanticType};
pub use service::CrudService;
pub use state::AppState;
pub use transform::TransformRegistry;
