use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryPatch, Comment, CommentPatch, CommentWithAuthor, NewCategory, NewComment,
    NewPost, NewUser, Post, PostDetail, PostFilter, PostPatch, PostWithRelations, User, UserPatch,
};
use crate::error::RepoError;
use crate::pagination::PageRequest;

/// Generic repository trait defining the operations every entity shares.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Fetch every entity whose ID is in `ids`, in no particular order.
    async fn find_by_ids(&self, ids: &[ID]) -> Result<Vec<T>, RepoError>;

    /// Delete an entity by its ID. Returns [`RepoError::NotFound`] when nothing was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Users are listed oldest first.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, RepoError>;

    async fn create(&self, input: NewUser) -> Result<User, RepoError>;

    /// Apply a partial update. `Ok(None)` when the user does not exist.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, RepoError>;
}

/// Category repository. Categories are listed by name.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn list(&self, page: PageRequest) -> Result<Vec<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn create(&self, input: NewCategory) -> Result<Category, RepoError>;

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Option<Category>, RepoError>;
}

/// Post repository. Posts are listed newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Vec<Post>, RepoError>;

    /// Same page as [`PostRepository::list`] with authors and categories embedded.
    async fn list_with_relations(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<PostWithRelations>, RepoError>;

    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError>;

    async fn find_by_author_ids(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;

    async fn find_by_category_ids(&self, category_ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;

    async fn create(&self, input: NewPost) -> Result<Post, RepoError>;

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError>;
}

/// Comment repository. Comments are listed newest first.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list(&self, page: PageRequest) -> Result<Vec<Comment>, RepoError>;

    async fn list_with_author(&self, page: PageRequest) -> Result<Vec<CommentWithAuthor>, RepoError>;

    async fn find_with_author(&self, id: Uuid) -> Result<Option<CommentWithAuthor>, RepoError>;

    /// Comments of the given posts, oldest first.
    async fn find_by_post_ids(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_author_ids(&self, author_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError>;

    async fn create(&self, input: NewComment) -> Result<Comment, RepoError>;

    async fn update(&self, id: Uuid, patch: CommentPatch) -> Result<Option<Comment>, RepoError>;
}

/// The full set of repositories handed to request handlers.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
