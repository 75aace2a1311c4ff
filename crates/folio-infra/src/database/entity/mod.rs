//! SeaORM entities for the content tables.

pub mod category;
pub mod comment;
pub mod post;
pub mod user;
