pub mod auth;
pub mod entity;
pub mod meta;
