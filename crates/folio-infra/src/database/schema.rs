//! Table definitions derived from the entities, per dialect.

use sea_orm::sea_query::{Index, IndexCreateStatement, Table, TableCreateStatement, TableDropStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use super::adapter::Dialect;
use super::entity::{category, comment, post, user};

/// The content schema: users, categories, posts and comments.
#[derive(Debug, Clone, Copy)]
pub struct ContentSchema {
    dialect: Dialect,
}

impl ContentSchema {
    /// Table names in creation order.
    pub const TABLES: [&'static str; 4] = ["users", "categories", "posts", "comments"];

    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// `CREATE TABLE IF NOT EXISTS` for every table, referenced tables first.
    pub fn create_table_statements(&self) -> Vec<TableCreateStatement> {
        let schema = Schema::new(self.dialect.db_backend());
        vec![
            schema
                .create_table_from_entity(user::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(category::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(post::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(comment::Entity)
                .if_not_exists()
                .to_owned(),
        ]
    }

    /// Indexes on the foreign keys used by filters and batch loads.
    pub fn create_index_statements(&self) -> Vec<IndexCreateStatement> {
        vec![
            Index::create()
                .name("idx_posts_author_id")
                .table(post::Entity)
                .col(post::Column::AuthorId)
                .if_not_exists()
                .to_owned(),
            Index::create()
                .name("idx_posts_category_id")
                .table(post::Entity)
                .col(post::Column::CategoryId)
                .if_not_exists()
                .to_owned(),
            Index::create()
                .name("idx_comments_post_id")
                .table(comment::Entity)
                .col(comment::Column::PostId)
                .if_not_exists()
                .to_owned(),
        ]
    }

    /// `DROP TABLE IF EXISTS`, dependents first.
    pub fn drop_table_statements(&self) -> Vec<TableDropStatement> {
        vec![
            Table::drop().table(comment::Entity).if_exists().to_owned(),
            Table::drop().table(post::Entity).if_exists().to_owned(),
            Table::drop().table(category::Entity).if_exists().to_owned(),
            Table::drop().table(user::Entity).if_exists().to_owned(),
        ]
    }

    /// Create every table and index directly on `db`.
    pub async fn create_all(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let backend = self.dialect.db_backend();
        for statement in self.create_table_statements() {
            db.execute(backend.build(&statement)).await?;
        }
        for statement in self.create_index_statements() {
            db.execute(backend.build(&statement)).await?;
        }
        Ok(())
    }
}
