use juniper::{ID, graphql_object};

use folio_core::domain::PostFilter;
use folio_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};

use super::context::GraphQLContext;
use super::error::GraphQLResult;
use super::types::{
    CategoriesConnection, CategoryNode, CommentNode, CommentsConnection, PostFilters, PostNode,
    PostsConnection, UserNode, UsersConnection, page_request, parse_id,
};

pub struct QueryRoot;

#[graphql_object(name = "Query", context = GraphQLContext)]
impl QueryRoot {
    async fn users(
        context: &GraphQLContext,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> GraphQLResult<UsersConnection> {
        let page = page_request(page, limit)?;
        let users = context.repos.users.list(page).await?;
        context.loader.register_users(&users).await;

        Ok(UsersConnection {
            pagination: page.info(users.len()).into(),
            users: users.into_iter().map(UserNode).collect(),
        })
    }

    async fn user(context: &GraphQLContext, id: ID) -> GraphQLResult<Option<UserNode>> {
        let user = context.repos.users.find_by_id(parse_id(&id)?).await?;
        Ok(user.map(UserNode))
    }

    async fn categories(
        context: &GraphQLContext,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> GraphQLResult<CategoriesConnection> {
        let page = page_request(page, limit)?;
        let categories = context.repos.categories.list(page).await?;
        context.loader.register_categories(&categories).await;

        Ok(CategoriesConnection {
            pagination: page.info(categories.len()).into(),
            categories: categories.into_iter().map(CategoryNode).collect(),
        })
    }

    async fn category(context: &GraphQLContext, id: ID) -> GraphQLResult<Option<CategoryNode>> {
        let category = context.repos.categories.find_by_id(parse_id(&id)?).await?;
        Ok(category.map(CategoryNode))
    }

    async fn category_by_slug(
        context: &GraphQLContext,
        slug: String,
    ) -> GraphQLResult<Option<CategoryNode>> {
        let category = context.repos.categories.find_by_slug(&slug).await?;
        Ok(category.map(CategoryNode))
    }

    async fn posts(
        context: &GraphQLContext,
        page: Option<i32>,
        limit: Option<i32>,
        filters: Option<PostFilters>,
    ) -> GraphQLResult<PostsConnection> {
        let page = page_request(page, limit)?;
        let filters = filters.unwrap_or_default();
        let author_id = filters.author_id.map(|id| id.to_string());
        let category_id = filters.category_id.map(|id| id.to_string());
        let filter = PostFilter::parse(
            filters.published,
            author_id.as_deref(),
            category_id.as_deref(),
            filters.category_slug,
        )?;

        let posts = context.repos.posts.list(&filter, page).await?;
        context.loader.register_posts(&posts).await;

        Ok(PostsConnection {
            pagination: page.info(posts.len()).into(),
            posts: posts.into_iter().map(PostNode).collect(),
        })
    }

    async fn post(context: &GraphQLContext, id: ID) -> GraphQLResult<Option<PostNode>> {
        let post = context.repos.posts.find_by_id(parse_id(&id)?).await?;
        Ok(post.map(PostNode))
    }

    async fn posts_by_category(
        context: &GraphQLContext,
        category_id: ID,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> GraphQLResult<PostsConnection> {
        let page = page_request(page, limit)?;
        let filter = PostFilter::by_category(parse_id(&category_id)?);

        let posts = context.repos.posts.list(&filter, page).await?;
        context.loader.register_posts(&posts).await;

        Ok(PostsConnection {
            pagination: page.info(posts.len()).into(),
            posts: posts.into_iter().map(PostNode).collect(),
        })
    }

    async fn comments(
        context: &GraphQLContext,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> GraphQLResult<CommentsConnection> {
        let page = page_request(page, limit)?;
        let comments = context.repos.comments.list(page).await?;
        context.loader.register_comments(&comments).await;

        Ok(CommentsConnection {
            pagination: page.info(comments.len()).into(),
            comments: comments.into_iter().map(CommentNode).collect(),
        })
    }

    async fn comment(context: &GraphQLContext, id: ID) -> GraphQLResult<Option<CommentNode>> {
        let comment = context.repos.comments.find_by_id(parse_id(&id)?).await?;
        Ok(comment.map(CommentNode))
    }
}
