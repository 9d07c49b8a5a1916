//! Schema introspection and the per-table record model derived from it.

pub mod introspect;
pub mod model;
pub mod types;

pub use introspect::columns_for;
pub use model::{build_model, shape_body, ColumnSpec, ResolvedModel, ResolvedTable};
pub use types::{map_type, SemanticType};
