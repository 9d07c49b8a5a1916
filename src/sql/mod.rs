//! Parameterized SQL construction. Identifiers come only from the static
//! registry and the introspected model; values are always bound.

pub mod builder;
pub mod params;

pub use builder::{delete, insert, select_by_id, select_list, select_login, update, QueryBuf};
pub use params::PgBindValue;
