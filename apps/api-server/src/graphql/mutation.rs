use juniper::{ID, graphql_object};

use folio_core::domain::{
    CategoryChanges, CategoryDraft, CommentChanges, CommentDraft, PostChanges, PostDraft,
    UserChanges, UserDraft,
};
use folio_core::error::RepoError;
use folio_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};

use super::context::GraphQLContext;
use super::error::{GraphQLError, GraphQLResult, Required};
use super::types::{
    CategoryNode, CommentNode, CreateCategoryInput, CreateCommentInput, CreatePostInput,
    CreateUserInput, PostNode, UpdateCategoryInput, UpdateCommentInput, UpdatePostInput,
    UpdateUserInput, UserNode, parse_id,
};

/// `true` when a row was removed, `false` when there was nothing to remove.
fn deleted(result: Result<(), RepoError>) -> GraphQLResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(RepoError::NotFound) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn slug_conflict(err: RepoError) -> GraphQLError {
    match err {
        RepoError::Constraint(_) => {
            GraphQLError::Conflict("Category with this slug already exists".to_string())
        }
        other => other.into(),
    }
}

pub struct MutationRoot;

#[graphql_object(name = "Mutation", context = GraphQLContext)]
impl MutationRoot {
    async fn create_user(context: &GraphQLContext, input: CreateUserInput) -> GraphQLResult<UserNode> {
        let input = UserDraft::from(input).validate()?;
        let user = context.repos.users.create(input).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(UserNode(user))
    }

    async fn update_user(
        context: &GraphQLContext,
        id: ID,
        input: UpdateUserInput,
    ) -> GraphQLResult<UserNode> {
        let id = parse_id(&id)?;
        let patch = UserChanges::from(input).validate()?;
        let user = context.repos.users.update(id, patch).await.required("User")?;
        Ok(UserNode(user))
    }

    async fn delete_user(context: &GraphQLContext, id: ID) -> GraphQLResult<bool> {
        deleted(context.repos.users.delete(parse_id(&id)?).await)
    }

    async fn create_category(
        context: &GraphQLContext,
        input: CreateCategoryInput,
    ) -> GraphQLResult<CategoryNode> {
        let input = CategoryDraft::from(input).validate()?;
        let category = context
            .repos
            .categories
            .create(input)
            .await
            .map_err(slug_conflict)?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(CategoryNode(category))
    }

    async fn update_category(
        context: &GraphQLContext,
        id: ID,
        input: UpdateCategoryInput,
    ) -> GraphQLResult<CategoryNode> {
        let id = parse_id(&id)?;
        let patch = CategoryChanges::from(input).validate()?;
        let category = context
            .repos
            .categories
            .update(id, patch)
            .await
            .map_err(slug_conflict)?
            .ok_or(GraphQLError::NotFound("Category"))?;
        Ok(CategoryNode(category))
    }

    async fn delete_category(context: &GraphQLContext, id: ID) -> GraphQLResult<bool> {
        deleted(context.repos.categories.delete(parse_id(&id)?).await)
    }

    async fn create_post(context: &GraphQLContext, input: CreatePostInput) -> GraphQLResult<PostNode> {
        let input = PostDraft::from(input).validate()?;
        let post = context.repos.posts.create(input).await?;
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(PostNode(post))
    }

    async fn update_post(
        context: &GraphQLContext,
        id: ID,
        input: UpdatePostInput,
    ) -> GraphQLResult<PostNode> {
        let id = parse_id(&id)?;
        let patch = PostChanges::from(input).validate()?;
        let post = context.repos.posts.update(id, patch).await.required("Post")?;
        Ok(PostNode(post))
    }

    async fn delete_post(context: &GraphQLContext, id: ID) -> GraphQLResult<bool> {
        deleted(context.repos.posts.delete(parse_id(&id)?).await)
    }

    async fn create_comment(
        context: &GraphQLContext,
        input: CreateCommentInput,
    ) -> GraphQLResult<CommentNode> {
        let input = CommentDraft::from(input).validate()?;
        let comment = context.repos.comments.create(input).await?;
        Ok(CommentNode(comment))
    }

    async fn update_comment(
        context: &GraphQLContext,
        id: ID,
        input: UpdateCommentInput,
    ) -> GraphQLResult<CommentNode> {
        let id = parse_id(&id)?;
        let patch = CommentChanges::from(input).validate()?;
        let comment = context
            .repos
            .comments
            .update(id, patch)
            .await
            .required("Comment")?;
        Ok(CommentNode(comment))
    }

    async fn delete_comment(context: &GraphQLContext, id: ID) -> GraphQLResult<bool> {
        deleted(context.repos.comments.delete(parse_id(&id)?).await)
    }
}
