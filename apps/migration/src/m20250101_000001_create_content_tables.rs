use folio_infra::database::{ContentSchema, Dialect};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn content_schema(manager: &SchemaManager) -> Result<ContentSchema, DbErr> {
    let backend = manager.get_database_backend();
    Dialect::from_db_backend(backend)
        .map(ContentSchema::new)
        .ok_or_else(|| DbErr::Migration(format!("unsupported database backend: {backend:?}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = content_schema(manager)?;
        for table in schema.create_table_statements() {
            manager.create_table(table).await?;
        }
        for index in schema.create_index_statements() {
            manager.create_index(index).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = content_schema(manager)?;
        for table in schema.drop_table_statements() {
            manager.drop_table(table).await?;
        }
        Ok(())
    }
}
