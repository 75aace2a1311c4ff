use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use folio_core::domain::{Category, CategoryPatch, NewCategory};
use folio_core::error::RepoError;
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, CategoryRepository};

use super::SeaCategoryRepository;
use crate::database::entity::category::{self, Entity as CategoryEntity};
use crate::database::sea_base::{map_db_err, updated};

#[async_trait]
impl CategoryRepository for SeaCategoryRepository {
    async fn list(&self, page: PageRequest) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .limit(page.limit())
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        tracing::debug!(slug, "Finding category by slug");

        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, input: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            slug: Set(input.slug),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Option<Category>, RepoError> {
        if patch.is_empty() {
            return BaseRepository::<Category, Uuid>::find_by_id(self, id).await;
        }

        let active = category::ActiveModel {
            id: Unchanged(id),
            name: patch.name.map_or(NotSet, Set),
            slug: patch.slug.map_or(NotSet, Set),
        };

        Ok(updated(active.update(&self.db).await)?.map(Into::into))
    }
}
