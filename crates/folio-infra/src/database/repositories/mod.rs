//! SeaORM repository implementations.

mod category;
mod comment;
mod post;
mod user;

use std::sync::Arc;

use sea_orm::DbConn;

use folio_core::ports::Repositories;

use super::entity::{category as category_entity, comment as comment_entity};
use super::entity::{post as post_entity, user as user_entity};
use super::sea_base::SeaBaseRepository;

/// SeaORM user repository.
pub type SeaUserRepository = SeaBaseRepository<user_entity::Entity>;

/// SeaORM category repository.
pub type SeaCategoryRepository = SeaBaseRepository<category_entity::Entity>;

/// SeaORM post repository.
pub type SeaPostRepository = SeaBaseRepository<post_entity::Entity>;

/// SeaORM comment repository.
pub type SeaCommentRepository = SeaBaseRepository<comment_entity::Entity>;

/// Wire every repository to one connection.
pub fn repositories(db: &DbConn) -> Repositories {
    Repositories {
        users: Arc::new(SeaUserRepository::new(db.clone())),
        categories: Arc::new(SeaCategoryRepository::new(db.clone())),
        posts: Arc::new(SeaPostRepository::new(db.clone())),
        comments: Arc::new(SeaCommentRepository::new(db.clone())),
    }
}
