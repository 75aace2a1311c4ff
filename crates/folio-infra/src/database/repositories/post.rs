use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, LoaderTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use folio_core::domain::{
    CommentWithAuthor, NewPost, Post, PostDetail, PostFilter, PostPatch, PostWithRelations,
};
use folio_core::error::RepoError;
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, PostRepository};

use super::SeaPostRepository;
use super::user::author_summary;
use crate::database::entity::category::{self, Entity as CategoryEntity};
use crate::database::entity::comment::{self, Entity as CommentEntity};
use crate::database::entity::post::{self, Entity as PostEntity};
use crate::database::entity::user::Entity as UserEntity;
use crate::database::sea_base::{creation_timestamp, map_db_err, updated};

/// Posts matching `filter`, newest first.
fn filtered(filter: &PostFilter) -> Select<PostEntity> {
    let mut query = PostEntity::find();
    if let Some(published) = filter.published {
        query = query.filter(post::Column::Published.eq(published));
    }
    if let Some(author_id) = filter.author_id {
        query = query.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(slug) = &filter.category_slug {
        query = query
            .join(JoinType::InnerJoin, post::Relation::Category.def())
            .filter(category::Column::Slug.eq(slug.as_str()));
    }
    query
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

impl SeaPostRepository {
    async fn page(&self, filter: &PostFilter, page: PageRequest) -> Result<Vec<post::Model>, RepoError> {
        filtered(filter)
            .limit(page.limit())
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Attach authors and categories with one query per relation.
    async fn embed(&self, posts: Vec<post::Model>) -> Result<Vec<PostWithRelations>, RepoError> {
        let authors = posts
            .load_one(UserEntity, &self.db)
            .await
            .map_err(map_db_err)?;
        let categories = posts
            .load_one(CategoryEntity, &self.db)
            .await
            .map_err(map_db_err)?;

        Ok(posts
            .into_iter()
            .zip(authors)
            .zip(categories)
            .map(|((post, author), category)| PostWithRelations {
                post: post.into(),
                author: author.map(author_summary),
                category: category.map(Into::into),
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for SeaPostRepository {
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Vec<Post>, RepoError> {
        let result = self.page(filter, page).await?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_with_relations(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<PostWithRelations>, RepoError> {
        let posts = self.page(filter, page).await?;
        self.embed(posts).await
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let Some(post) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let author = post
            .find_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        let category = post
            .find_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        let comments = CommentEntity::find()
            .filter(comment::Column::PostId.eq(id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        let comment_authors = comments
            .load_one(UserEntity, &self.db)
            .await
            .map_err(map_db_err)?;

        let comments = comments
            .into_iter()
            .zip(comment_authors)
            .map(|(comment, author)| CommentWithAuthor {
                comment: comment.into(),
                author: author.map(author_summary),
            })
            .collect();

        Ok(Some(PostDetail {
            post: post.into(),
            author: author.map(author_summary),
            category: category.map(Into::into),
            comments,
        }))
    }

    async fn find_by_author_ids(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = PostEntity::find()
            .filter(post::Column::AuthorId.is_in(author_ids.iter().copied()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_category_ids(&self, category_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = PostEntity::find()
            .filter(post::Column::CategoryId.is_in(category_ids.iter().copied()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            content: Set(input.content),
            published: Set(input.published),
            author_id: Set(input.author_id),
            category_id: Set(input.category_id),
            created_at: Set(creation_timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::debug!(post_id = %model.id, author_id = %model.author_id, "Post created");
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        if patch.is_empty() {
            return BaseRepository::<Post, Uuid>::find_by_id(self, id).await;
        }

        let active = post::ActiveModel {
            id: Unchanged(id),
            title: patch.title.map_or(NotSet, Set),
            content: patch.content.map_or(NotSet, Set),
            published: patch.published.map_or(NotSet, Set),
            category_id: patch.category_id.map_or(NotSet, Set),
            author_id: NotSet,
            created_at: NotSet,
        };

        Ok(updated(active.update(&self.db).await)?.map(Into::into))
    }
}
