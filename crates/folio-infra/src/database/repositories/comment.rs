use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use folio_core::domain::{Comment, CommentPatch, CommentWithAuthor, NewComment};
use folio_core::error::RepoError;
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, CommentRepository};

use super::SeaCommentRepository;
use super::user::author_summary;
use crate::database::entity::comment::{self, Entity as CommentEntity};
use crate::database::entity::user::Entity as UserEntity;
use crate::database::sea_base::{creation_timestamp, map_db_err, updated};

impl SeaCommentRepository {
    async fn page(&self, page: PageRequest) -> Result<Vec<comment::Model>, RepoError> {
        CommentEntity::find()
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .limit(page.limit())
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn with_authors(&self, comments: Vec<comment::Model>) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let authors = comments
            .load_one(UserEntity, &self.db)
            .await
            .map_err(map_db_err)?;

        Ok(comments
            .into_iter()
            .zip(authors)
            .map(|(comment, author)| CommentWithAuthor {
                comment: comment.into(),
                author: author.map(author_summary),
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for SeaCommentRepository {
    async fn list(&self, page: PageRequest) -> Result<Vec<Comment>, RepoError> {
        let result = self.page(page).await?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_with_author(&self, page: PageRequest) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let comments = self.page(page).await?;
        self.with_authors(comments).await
    }

    async fn find_with_author(&self, id: Uuid) -> Result<Option<CommentWithAuthor>, RepoError> {
        let Some(comment) = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.with_authors(vec![comment]).await?.pop())
    }

    async fn find_by_post_ids(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author_ids(&self, author_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CommentEntity::find()
            .filter(comment::Column::AuthorId.is_in(author_ids.iter().copied()))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            content: Set(input.content),
            post_id: Set(input.post_id),
            author_id: Set(input.author_id),
            created_at: Set(creation_timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: Uuid, patch: CommentPatch) -> Result<Option<Comment>, RepoError> {
        if patch.is_empty() {
            return BaseRepository::<Comment, Uuid>::find_by_id(self, id).await;
        }

        let active = comment::ActiveModel {
            id: Unchanged(id),
            content: patch.content.map_or(NotSet, Set),
            ..Default::default()
        };

        Ok(updated(active.update(&self.db).await)?.map(Into::into))
    }
}
