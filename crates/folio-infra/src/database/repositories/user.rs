use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect};
use uuid::Uuid;

use folio_core::domain::{AuthorSummary, NewUser, User, UserPatch};
use folio_core::error::RepoError;
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, UserRepository};

use super::SeaUserRepository;
use crate::database::entity::user::{self, Entity as UserEntity};
use crate::database::sea_base::{creation_timestamp, map_db_err, updated};

pub(super) fn author_summary(model: user::Model) -> AuthorSummary {
    User::from(model).into()
}

#[async_trait]
impl UserRepository for SeaUserRepository {
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .limit(page.limit())
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            avatar_url: Set(input.avatar_url),
            created_at: Set(creation_timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::debug!(user_id = %model.id, "User created");
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, RepoError> {
        if patch.is_empty() {
            return BaseRepository::<User, Uuid>::find_by_id(self, id).await;
        }

        let active = user::ActiveModel {
            id: Unchanged(id),
            name: patch.name.map_or(NotSet, Set),
            avatar_url: patch.avatar_url.map_or(NotSet, Set),
            created_at: NotSet,
        };

        Ok(updated(active.update(&self.db).await)?.map(Into::into))
    }
}
