//! GraphQL object and input types.

use juniper::{GraphQLInputObject, GraphQLObject, ID, Nullable, graphql_object};
use uuid::Uuid;

use folio_core::domain::{
    Category, CategoryChanges, CategoryDraft, Comment, CommentChanges, CommentDraft, Post,
    PostChanges, PostDraft, User, UserChanges, UserDraft,
};
use folio_core::pagination::{PageInfo, PageRequest};
use folio_core::validation::{self, ValidationErrors};

use super::context::GraphQLContext;
use super::error::{GraphQLResult, Required};
use super::scalar::DateTimeScalar;

fn to_id(id: Uuid) -> ID {
    ID::new(id.to_string())
}

/// Parse an `ID!` argument.
pub fn parse_id(id: &ID) -> GraphQLResult<Uuid> {
    validation::parse_id(id)
        .ok_or_else(|| ValidationErrors::single("id", "Invalid ID format").into())
}

/// Validate optional `page`/`limit` arguments.
pub fn page_request(page: Option<i32>, limit: Option<i32>) -> GraphQLResult<PageRequest> {
    Ok(PageRequest::new(page.map(i64::from), limit.map(i64::from))?)
}

pub struct UserNode(pub User);

#[graphql_object(name = "User", context = GraphQLContext)]
impl UserNode {
    fn id(&self) -> ID {
        to_id(self.0.id)
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn avatar_url(&self) -> Option<&str> {
        self.0.avatar_url.as_deref()
    }

    fn created_at(&self) -> DateTimeScalar {
        self.0.created_at.into()
    }

    async fn posts(&self, context: &GraphQLContext) -> GraphQLResult<Vec<PostNode>> {
        let posts = context.loader.posts_by_author(self.0.id).await?;
        context.loader.prime_user(&self.0).await;
        context.loader.register_posts(&posts).await;
        Ok(posts.into_iter().map(PostNode).collect())
    }

    async fn comments(&self, context: &GraphQLContext) -> GraphQLResult<Vec<CommentNode>> {
        let comments = context.loader.comments_by_author(self.0.id).await?;
        context.loader.prime_user(&self.0).await;
        context.loader.register_comments(&comments).await;
        Ok(comments.into_iter().map(CommentNode).collect())
    }
}

pub struct CategoryNode(pub Category);

#[graphql_object(name = "Category", context = GraphQLContext)]
impl CategoryNode {
    fn id(&self) -> ID {
        to_id(self.0.id)
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn posts(&self, context: &GraphQLContext) -> GraphQLResult<Vec<PostNode>> {
        let posts = context.loader.posts_by_category(self.0.id).await?;
        context.loader.prime_category(&self.0).await;
        context.loader.register_posts(&posts).await;
        Ok(posts.into_iter().map(PostNode).collect())
    }
}

pub struct PostNode(pub Post);

#[graphql_object(name = "Post", context = GraphQLContext)]
impl PostNode {
    fn id(&self) -> ID {
        to_id(self.0.id)
    }

    fn title(&self) -> &str {
        &self.0.title
    }

    fn content(&self) -> &str {
        &self.0.content
    }

    fn published(&self) -> bool {
        self.0.published
    }

    fn created_at(&self) -> DateTimeScalar {
        self.0.created_at.into()
    }

    async fn author(&self, context: &GraphQLContext) -> GraphQLResult<UserNode> {
        let author = context.loader.user(self.0.author_id).await.required("User")?;
        Ok(UserNode(author))
    }

    async fn category(&self, context: &GraphQLContext) -> GraphQLResult<CategoryNode> {
        let category = context
            .loader
            .category(self.0.category_id)
            .await
            .required("Category")?;
        Ok(CategoryNode(category))
    }

    async fn comments(&self, context: &GraphQLContext) -> GraphQLResult<Vec<CommentNode>> {
        let comments = context.loader.comments_by_post(self.0.id).await?;
        context.loader.prime_post(&self.0).await;
        context.loader.register_comments(&comments).await;
        Ok(comments.into_iter().map(CommentNode).collect())
    }
}

pub struct CommentNode(pub Comment);

#[graphql_object(name = "Comment", context = GraphQLContext)]
impl CommentNode {
    fn id(&self) -> ID {
        to_id(self.0.id)
    }

    fn content(&self) -> &str {
        &self.0.content
    }

    fn created_at(&self) -> DateTimeScalar {
        self.0.created_at.into()
    }

    async fn post(&self, context: &GraphQLContext) -> GraphQLResult<PostNode> {
        let post = context.loader.post(self.0.post_id).await.required("Post")?;
        Ok(PostNode(post))
    }

    async fn author(&self, context: &GraphQLContext) -> GraphQLResult<UserNode> {
        let author = context.loader.user(self.0.author_id).await.required("User")?;
        Ok(UserNode(author))
    }
}

#[derive(GraphQLObject)]
pub struct PaginationInfo {
    pub page: i32,
    pub limit: i32,
    pub has_more: bool,
}

impl From<PageInfo> for PaginationInfo {
    fn from(info: PageInfo) -> Self {
        // Limits are capped at 100 and pages come from i32 arguments.
        Self {
            page: i32::try_from(info.page).unwrap_or(i32::MAX),
            limit: i32::try_from(info.limit).unwrap_or(i32::MAX),
            has_more: info.has_more,
        }
    }
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct UsersConnection {
    pub users: Vec<UserNode>,
    pub pagination: PaginationInfo,
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct CategoriesConnection {
    pub categories: Vec<CategoryNode>,
    pub pagination: PaginationInfo,
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct PostsConnection {
    pub posts: Vec<PostNode>,
    pub pagination: PaginationInfo,
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct CommentsConnection {
    pub comments: Vec<CommentNode>,
    pub pagination: PaginationInfo,
}

#[derive(GraphQLInputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<CreateUserInput> for UserDraft {
    fn from(input: CreateUserInput) -> Self {
        Self {
            name: Some(input.name),
            avatar_url: input.avatar_url,
        }
    }
}

/// `avatarUrl: null` clears the avatar; omitting it leaves the avatar alone.
#[derive(GraphQLInputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub avatar_url: Nullable<String>,
}

impl From<UpdateUserInput> for UserChanges {
    fn from(input: UpdateUserInput) -> Self {
        let avatar_url = match input.avatar_url {
            Nullable::ImplicitNull => None,
            Nullable::ExplicitNull => Some(None),
            Nullable::Some(url) => Some(Some(url)),
        };
        Self {
            name: input.name,
            avatar_url,
        }
    }
}

#[derive(GraphQLInputObject)]
pub struct CreateCategoryInput {
    pub name: String,
    pub slug: String,
}

impl From<CreateCategoryInput> for CategoryDraft {
    fn from(input: CreateCategoryInput) -> Self {
        Self {
            name: Some(input.name),
            slug: Some(input.slug),
        }
    }
}

#[derive(GraphQLInputObject)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl From<UpdateCategoryInput> for CategoryChanges {
    fn from(input: UpdateCategoryInput) -> Self {
        Self {
            name: input.name,
            slug: input.slug,
        }
    }
}

#[derive(GraphQLInputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    #[graphql(default = false)]
    pub published: Option<bool>,
    pub author_id: ID,
    pub category_id: ID,
}

impl From<CreatePostInput> for PostDraft {
    fn from(input: CreatePostInput) -> Self {
        Self {
            title: Some(input.title),
            content: Some(input.content),
            published: input.published,
            author_id: Some(input.author_id.to_string()),
            category_id: Some(input.category_id.to_string()),
        }
    }
}

#[derive(GraphQLInputObject)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<ID>,
}

impl From<UpdatePostInput> for PostChanges {
    fn from(input: UpdatePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
            published: input.published,
            category_id: input.category_id.map(|id| id.to_string()),
        }
    }
}

#[derive(GraphQLInputObject)]
pub struct CreateCommentInput {
    pub content: String,
    pub post_id: ID,
    pub author_id: ID,
}

impl From<CreateCommentInput> for CommentDraft {
    fn from(input: CreateCommentInput) -> Self {
        Self {
            content: Some(input.content),
            post_id: Some(input.post_id.to_string()),
            author_id: Some(input.author_id.to_string()),
        }
    }
}

#[derive(GraphQLInputObject)]
pub struct UpdateCommentInput {
    pub content: String,
}

impl From<UpdateCommentInput> for CommentChanges {
    fn from(input: UpdateCommentInput) -> Self {
        Self {
            content: Some(input.content),
        }
    }
}

#[derive(GraphQLInputObject, Default)]
pub struct PostFilters {
    pub published: Option<bool>,
    pub author_id: Option<ID>,
    pub category_id: Option<ID>,
    pub category_slug: Option<String>,
}
