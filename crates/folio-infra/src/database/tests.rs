use std::time::Duration;

use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use folio_core::domain::{
    CategoryPatch, NewCategory, NewComment, NewPost, NewUser, Post, PostFilter, PostPatch, User,
    UserPatch,
};
use folio_core::error::RepoError;
use folio_core::pagination::PageRequest;
use folio_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, Repositories,
    UserRepository,
};

use super::entity::post;
use super::{
    ContentSchema, DatabaseAdapter, DatabaseConfig, SeaPostRepository, create_adapter,
    repositories, seed,
};

async fn setup() -> (DatabaseAdapter, Repositories) {
    let mut adapter = create_adapter(&DatabaseConfig::in_memory()).unwrap();
    adapter.initialize().await.unwrap();
    let db = adapter.db().unwrap();
    adapter.schema().create_all(db).await.unwrap();
    let repos = repositories(db);
    (adapter, repos)
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        avatar_url: None,
    }
}

fn new_category(name: &str, slug: &str) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

fn new_post(title: &str, author_id: Uuid, category_id: Uuid, published: bool) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("{title} content"),
        published,
        author_id,
        category_id,
    }
}

#[tokio::test]
async fn test_adapter_lifecycle() {
    let mut adapter = create_adapter(&DatabaseConfig::in_memory()).unwrap();
    assert!(!adapter.health().await);

    adapter.initialize().await.unwrap();
    assert!(adapter.is_initialized());
    assert!(adapter.health().await);
    assert!(adapter.db().is_ok());

    adapter.close().await.unwrap();
    assert!(!adapter.is_initialized());
    assert!(!adapter.health().await);
    assert!(adapter.db().is_err());
}

#[tokio::test]
async fn test_schema_renders_every_table() {
    let (adapter, _) = setup().await;
    let statements = adapter.schema().create_table_statements();
    assert_eq!(statements.len(), ContentSchema::TABLES.len());
}

#[tokio::test]
async fn test_user_round_trip() {
    let (_adapter, repos) = setup().await;

    let created = repos
        .users
        .create(NewUser {
            name: "Ada".into(),
            avatar_url: Some("https://example.com/ada.png".into()),
        })
        .await
        .unwrap();

    let fetched = repos.users.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_user_update_clears_avatar() {
    let (_adapter, repos) = setup().await;
    let user = repos
        .users
        .create(NewUser {
            name: "Ada".into(),
            avatar_url: Some("https://example.com/ada.png".into()),
        })
        .await
        .unwrap();

    let updated = repos
        .users
        .update(
            user.id,
            UserPatch {
                name: None,
                avatar_url: Some(None),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.avatar_url, None);
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test]
async fn test_update_and_delete_missing_rows() {
    let (_adapter, repos) = setup().await;
    let missing = Uuid::new_v4();

    let result = repos
        .users
        .update(
            missing,
            UserPatch {
                name: Some("Nobody".into()),
                avatar_url: None,
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());

    assert!(matches!(
        repos.users.delete(missing).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_duplicate_slug_is_a_constraint_error() {
    let (_adapter, repos) = setup().await;
    repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();

    let result = repos.categories.create(new_category("Other", "dev")).await;
    assert!(matches!(result, Err(RepoError::Constraint(_))));

    let found = repos.categories.find_by_slug("dev").await.unwrap().unwrap();
    assert_eq!(found.name, "Dev");
}

#[tokio::test]
async fn test_category_update_keeps_unspecified_fields() {
    let (_adapter, repos) = setup().await;
    let category = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();

    let updated = repos
        .categories
        .update(
            category.id,
            CategoryPatch {
                name: Some("Development".into()),
                slug: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Development");
    assert_eq!(updated.slug, "dev");
}

#[tokio::test]
async fn test_post_with_dangling_author_fails() {
    let (_adapter, repos) = setup().await;
    let category = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();

    let result = repos
        .posts
        .create(new_post("Orphan", Uuid::new_v4(), category.id, true))
        .await;
    assert!(matches!(result, Err(RepoError::ForeignKey(_))));
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let (_adapter, repos) = setup().await;
    let author = repos.users.create(new_user("Author")).await.unwrap();
    let reader = repos.users.create(new_user("Reader")).await.unwrap();
    let category = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();
    let post = repos
        .posts
        .create(new_post("Hello", author.id, category.id, true))
        .await
        .unwrap();
    let comment = repos
        .comments
        .create(NewComment {
            content: "Nice".into(),
            post_id: post.id,
            author_id: reader.id,
        })
        .await
        .unwrap();

    repos.users.delete(author.id).await.unwrap();

    assert!(repos.posts.find_by_id(post.id).await.unwrap().is_none());
    assert!(repos.comments.find_by_id(comment.id).await.unwrap().is_none());
    assert!(repos.users.find_by_id(reader.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleting_category_cascades() {
    let (_adapter, repos) = setup().await;
    let author = repos.users.create(new_user("Author")).await.unwrap();
    let dev = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();
    let life = repos
        .categories
        .create(new_category("Life", "life"))
        .await
        .unwrap();
    let doomed = repos
        .posts
        .create(new_post("Hello", author.id, dev.id, true))
        .await
        .unwrap();
    let kept = repos
        .posts
        .create(new_post("Elsewhere", author.id, life.id, true))
        .await
        .unwrap();
    let comment = repos
        .comments
        .create(NewComment {
            content: "Nice".into(),
            post_id: doomed.id,
            author_id: author.id,
        })
        .await
        .unwrap();

    repos.categories.delete(dev.id).await.unwrap();

    assert!(repos.categories.find_by_id(dev.id).await.unwrap().is_none());
    assert!(repos.posts.find_by_id(doomed.id).await.unwrap().is_none());
    assert!(repos.comments.find_by_id(comment.id).await.unwrap().is_none());
    assert!(repos.posts.find_by_id(kept.id).await.unwrap().is_some());
    assert!(repos.users.find_by_id(author.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleting_post_cascades_to_comments() {
    let (_adapter, repos) = setup().await;
    let author = repos.users.create(new_user("Author")).await.unwrap();
    let category = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();
    let post = repos
        .posts
        .create(new_post("Hello", author.id, category.id, true))
        .await
        .unwrap();
    let mut comments = Vec::new();
    for content in ["First", "Second"] {
        let comment = repos
            .comments
            .create(NewComment {
                content: content.into(),
                post_id: post.id,
                author_id: author.id,
            })
            .await
            .unwrap();
        comments.push(comment);
    }

    repos.posts.delete(post.id).await.unwrap();

    assert!(repos.posts.find_by_id(post.id).await.unwrap().is_none());
    for comment in comments {
        assert!(repos.comments.find_by_id(comment.id).await.unwrap().is_none());
    }
    assert!(repos.categories.find_by_id(category.id).await.unwrap().is_some());
    assert!(repos.users.find_by_id(author.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_post_filters_and_embedding() {
    let (_adapter, repos) = setup().await;
    let author = repos.users.create(new_user("Author")).await.unwrap();
    let dev = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();
    let life = repos
        .categories
        .create(new_category("Life", "life"))
        .await
        .unwrap();

    for (title, category, published) in [("a", dev.id, true), ("b", dev.id, false), ("c", life.id, true)] {
        repos
            .posts
            .create(new_post(title, author.id, category, published))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let page = PageRequest::default();
    let by_slug = PostFilter {
        category_slug: Some("dev".into()),
        ..PostFilter::default()
    };
    let posts = repos.posts.list_with_relations(&by_slug, page).await.unwrap();
    let titles: Vec<_> = posts.iter().map(|p| p.post.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "a"]);
    assert!(posts.iter().all(|p| p.category.as_ref().unwrap().slug == "dev"));
    assert_eq!(posts[0].author.as_ref().unwrap().name, "Author");

    let published = PostFilter {
        published: Some(true),
        ..PostFilter::default()
    };
    let posts = repos.posts.list(&published, page).await.unwrap();
    assert_eq!(posts.len(), 2);

    let page = PageRequest::new(Some(2), Some(2)).unwrap();
    let posts = repos.posts.list(&PostFilter::default(), page).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "a");
}

#[tokio::test]
async fn test_post_detail_orders_comments_oldest_first() {
    let (_adapter, repos) = setup().await;
    let author = repos.users.create(new_user("Author")).await.unwrap();
    let category = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();
    let post = repos
        .posts
        .create(new_post("Hello", author.id, category.id, true))
        .await
        .unwrap();
    for content in ["first", "second"] {
        repos
            .comments
            .create(NewComment {
                content: content.into(),
                post_id: post.id,
                author_id: author.id,
            })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let detail = repos.posts.find_detail(post.id).await.unwrap().unwrap();
    let contents: Vec<_> = detail
        .comments
        .iter()
        .map(|c| c.comment.content.as_str())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);
    assert_eq!(detail.comments[0].author.as_ref().unwrap().id, author.id);

    // Comment listings run the other way.
    let listed = repos
        .comments
        .list_with_author(PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed[0].comment.content, "second");
}

#[tokio::test]
async fn test_post_update_keeps_author() {
    let (_adapter, repos) = setup().await;
    let author = repos.users.create(new_user("Author")).await.unwrap();
    let category = repos
        .categories
        .create(new_category("Dev", "dev"))
        .await
        .unwrap();
    let post = repos
        .posts
        .create(new_post("Draft", author.id, category.id, false))
        .await
        .unwrap();

    let updated = repos
        .posts
        .update(
            post.id,
            PostPatch {
                published: Some(true),
                ..PostPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated.published);
    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.author_id, author.id);
}

#[tokio::test]
async fn test_batch_finders() {
    let (_adapter, repos) = setup().await;
    let first = repos.users.create(new_user("First")).await.unwrap();
    let second = repos.users.create(new_user("Second")).await.unwrap();

    let users: Vec<User> = repos
        .users
        .find_by_ids(&[first.id, second.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(users.len(), 2);

    let none: Vec<Post> = repos.posts.find_by_author_ids(&[]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_seed_replaces_content() {
    let (adapter, repos) = setup().await;
    let db = adapter.db().unwrap();

    seed::seed(db).await.unwrap();
    let summary = seed::seed(db).await.unwrap();
    assert_eq!(summary.users, 3);
    assert_eq!(summary.comments, 9);

    let users = repos.users.list(PageRequest::default()).await.unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0].name, "Alice Johnson");
    let dev = repos.categories.find_by_slug("dev").await.unwrap();
    assert!(dev.is_some());
}

#[tokio::test]
async fn test_find_post_by_id_on_postgres() {
    let post_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            published: true,
            author_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = SeaPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
}
