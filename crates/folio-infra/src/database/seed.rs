//! Sample content for local development.

use sea_orm::{DbConn, EntityTrait};

use folio_core::domain::{NewCategory, NewComment, NewPost, NewUser};
use folio_core::error::RepoError;

use super::entity::{category, comment, post, user};
use super::repositories::repositories;
use super::sea_base::map_db_err;

const USERS: [(&str, Option<&str>); 3] = [
    (
        "Alice Johnson",
        Some("https://api.dicebear.com/7.x/avataaars/svg?seed=alice"),
    ),
    (
        "Bob Smith",
        Some("https://api.dicebear.com/7.x/avataaars/svg?seed=bob"),
    ),
    ("Charlie Davis", None),
];

const CATEGORIES: [(&str, &str); 3] = [
    ("Development", "dev"),
    ("Design", "design"),
    ("Life", "life"),
];

/// (title, content, published, author index, category index)
const POSTS: [(&str, &str, bool, usize, usize); 7] = [
    (
        "Getting Started with Rust in 2025",
        "Rust keeps gaining ground for backend work. This post walks through the toolchain, the module system and the habits that make a first project pleasant.",
        true,
        0,
        0,
    ),
    (
        "Async Services with Actix Web",
        "Actix Web gives you a fast, typed HTTP layer. Here is how handlers, extractors and shared state fit together in a real service.",
        true,
        0,
        0,
    ),
    (
        "Mastering CSS Grid Layout",
        "CSS Grid has changed web layout for good. A practical guide to complex, responsive designs with very little code.",
        true,
        0,
        1,
    ),
    (
        "Building Scalable GraphQL APIs",
        "How to design GraphQL APIs that grow with the application while keeping query costs predictable.",
        false,
        0,
        0,
    ),
    (
        "Work-Life Balance in Tech",
        "Keeping a healthy balance matters in a fast-moving industry. These are the strategies that have worked for me over the years.",
        true,
        1,
        2,
    ),
    (
        "The Art of Minimalist UI Design",
        "Less is more in interface design. Building beautiful, functional screens from a handful of elements.",
        true,
        1,
        1,
    ),
    (
        "My Journey Learning to Code",
        "From complete beginner to professional developer: what I learned along the way and advice for anyone starting out.",
        true,
        2,
        2,
    ),
];

/// (content, post index, author index)
const COMMENTS: [(&str, usize, usize); 9] = [
    ("Great post! The compiler errors really are helpful once you get used to them.", 0, 1),
    ("Agreed. Cargo alone makes the switch worth it.", 0, 2),
    ("Thanks for the feedback! Error handling is next on my list.", 0, 0),
    ("Extractors are such a clean idea. Can't wait to use this in production.", 1, 2),
    ("The shared state pattern took me a while but it clicks eventually.", 1, 1),
    ("This resonates with me so much. Thank you for sharing your experience.", 4, 0),
    ("Setting boundaries has been the most important lesson for me.", 4, 2),
    ("Inspiring story! It's never too late to start coding.", 6, 0),
    ("The persistence really pays off in the long run.", 6, 1),
];

/// Row counts written by [`seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub posts: usize,
    pub comments: usize,
}

/// Delete every row, dependents first.
pub async fn clear(db: &DbConn) -> Result<(), RepoError> {
    comment::Entity::delete_many().exec(db).await.map_err(map_db_err)?;
    post::Entity::delete_many().exec(db).await.map_err(map_db_err)?;
    category::Entity::delete_many().exec(db).await.map_err(map_db_err)?;
    user::Entity::delete_many().exec(db).await.map_err(map_db_err)?;
    Ok(())
}

/// Replace all content with the sample data set.
pub async fn seed(db: &DbConn) -> Result<SeedSummary, RepoError> {
    tracing::info!("Clearing existing data");
    clear(db).await?;

    let repos = repositories(db);

    let mut users = Vec::with_capacity(USERS.len());
    for (name, avatar_url) in USERS {
        let user = repos
            .users
            .create(NewUser {
                name: name.to_string(),
                avatar_url: avatar_url.map(str::to_string),
            })
            .await?;
        users.push(user.id);
    }

    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for (name, slug) in CATEGORIES {
        let category = repos
            .categories
            .create(NewCategory {
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .await?;
        categories.push(category.id);
    }

    let mut posts = Vec::with_capacity(POSTS.len());
    for (title, content, published, author, category) in POSTS {
        let post = repos
            .posts
            .create(NewPost {
                title: title.to_string(),
                content: content.to_string(),
                published,
                author_id: users[author],
                category_id: categories[category],
            })
            .await?;
        posts.push(post.id);
    }

    for (content, post, author) in COMMENTS {
        repos
            .comments
            .create(NewComment {
                content: content.to_string(),
                post_id: posts[post],
                author_id: users[author],
            })
            .await?;
    }

    let summary = SeedSummary {
        users: users.len(),
        categories: categories.len(),
        posts: posts.len(),
        comments: COMMENTS.len(),
    };
    tracing::info!(?summary, "Database seeded");
    Ok(summary)
}
