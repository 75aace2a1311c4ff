//! Per-request relation loader.
//!
//! Resolvers that return rows register the foreign keys those rows point at. The
//! first relation field that is actually selected loads every registered key of
//! its kind with one `IN (...)` query; the sibling fields then read the cache.
//! A key that is requested without being registered is still loaded, alone.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;
use uuid::Uuid;

use folio_core::domain::{Category, Comment, Post, User};
use folio_core::error::RepoError;
use folio_core::ports::{BaseRepository, CommentRepository, PostRepository, Repositories};

/// Loaded values and the keys waiting for the next batch.
struct Batch<K, V> {
    loaded: HashMap<K, V>,
    pending: HashSet<K>,
}

impl<K: Eq + Hash + Copy, V> Batch<K, V> {
    fn new() -> Self {
        Self {
            loaded: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    fn register(&mut self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            if !self.loaded.contains_key(&key) {
                self.pending.insert(key);
            }
        }
    }

    fn prime(&mut self, key: K, value: V) {
        self.pending.remove(&key);
        self.loaded.insert(key, value);
    }

    /// Drain the pending keys, always including `key`.
    fn take(&mut self, key: K) -> Vec<K> {
        self.pending.insert(key);
        let loaded = &self.loaded;
        self.pending.drain().filter(|k| !loaded.contains_key(k)).collect()
    }
}

/// Group rows by a key, keeping their order inside each group.
fn group_by<T>(rows: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut groups: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

fn index_by<T>(rows: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Option<T>> {
    rows.into_iter().map(|row| (key(&row), Some(row))).collect()
}

pub struct Loader {
    repos: Repositories,
    users: Mutex<Batch<Uuid, Option<User>>>,
    categories: Mutex<Batch<Uuid, Option<Category>>>,
    posts: Mutex<Batch<Uuid, Option<Post>>>,
    posts_by_author: Mutex<Batch<Uuid, Vec<Post>>>,
    posts_by_category: Mutex<Batch<Uuid, Vec<Post>>>,
    comments_by_post: Mutex<Batch<Uuid, Vec<Comment>>>,
    comments_by_author: Mutex<Batch<Uuid, Vec<Comment>>>,
    batches: AtomicUsize,
}

impl Loader {
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            users: Mutex::new(Batch::new()),
            categories: Mutex::new(Batch::new()),
            posts: Mutex::new(Batch::new()),
            posts_by_author: Mutex::new(Batch::new()),
            posts_by_category: Mutex::new(Batch::new()),
            comments_by_post: Mutex::new(Batch::new()),
            comments_by_author: Mutex::new(Batch::new()),
            batches: AtomicUsize::new(0),
        }
    }

    /// Number of batch queries issued so far.
    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::Relaxed)
    }

    /// Return the cached value for `key`, or load it together with every pending key.
    ///
    /// The lock is held across the fetch, so concurrent siblings wait for the
    /// batch instead of issuing their own.
    async fn load<V, F, Fut>(
        &self,
        batch: &Mutex<Batch<Uuid, V>>,
        key: Uuid,
        what: &'static str,
        fetch: F,
    ) -> Result<V, RepoError>
    where
        V: Clone + Default,
        F: FnOnce(Vec<Uuid>) -> Fut,
        Fut: Future<Output = Result<HashMap<Uuid, V>, RepoError>>,
    {
        let mut batch = batch.lock().await;
        if let Some(value) = batch.loaded.get(&key) {
            return Ok(value.clone());
        }

        let keys = batch.take(key);
        self.batches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(relation = what, keys = keys.len(), "Loading relation batch");

        let mut found = fetch(keys.clone()).await?;
        for k in keys {
            let value = found.remove(&k).unwrap_or_default();
            batch.loaded.insert(k, value);
        }
        Ok(batch.loaded.get(&key).cloned().unwrap_or_default())
    }

    pub async fn user(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let repo = self.repos.users.clone();
        self.load(&self.users, id, "user", |ids| async move {
            Ok::<_, RepoError>(index_by(repo.find_by_ids(&ids).await?, |u| u.id))
        })
        .await
    }

    pub async fn category(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let repo = self.repos.categories.clone();
        self.load(&self.categories, id, "category", |ids| async move {
            Ok::<_, RepoError>(index_by(repo.find_by_ids(&ids).await?, |c| c.id))
        })
        .await
    }

    pub async fn post(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let repo = self.repos.posts.clone();
        self.load(&self.posts, id, "post", |ids| async move {
            Ok::<_, RepoError>(index_by(repo.find_by_ids(&ids).await?, |p| p.id))
        })
        .await
    }

    /// Posts of an author, newest first.
    pub async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let repo = self.repos.posts.clone();
        self.load(&self.posts_by_author, author_id, "posts_by_author", |ids| async move {
            Ok::<_, RepoError>(group_by(repo.find_by_author_ids(&ids).await?, |p| p.author_id))
        })
        .await
    }

    /// Posts in a category, newest first.
    pub async fn posts_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let repo = self.repos.posts.clone();
        self.load(&self.posts_by_category, category_id, "posts_by_category", |ids| async move {
            Ok::<_, RepoError>(group_by(repo.find_by_category_ids(&ids).await?, |p| p.category_id))
        })
        .await
    }

    /// Comments on a post, oldest first.
    pub async fn comments_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let repo = self.repos.comments.clone();
        self.load(&self.comments_by_post, post_id, "comments_by_post", |ids| async move {
            Ok::<_, RepoError>(group_by(repo.find_by_post_ids(&ids).await?, |c| c.post_id))
        })
        .await
    }

    /// Comments written by a user, newest first.
    pub async fn comments_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let repo = self.repos.comments.clone();
        self.load(&self.comments_by_author, author_id, "comments_by_author", |ids| async move {
            Ok::<_, RepoError>(group_by(repo.find_by_author_ids(&ids).await?, |c| c.author_id))
        })
        .await
    }

    pub async fn register_users(&self, users: &[User]) {
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        self.posts_by_author.lock().await.register(ids.iter().copied());
        self.comments_by_author.lock().await.register(ids);
    }

    pub async fn register_categories(&self, categories: &[Category]) {
        self.posts_by_category
            .lock()
            .await
            .register(categories.iter().map(|c| c.id));
    }

    pub async fn register_posts(&self, posts: &[Post]) {
        self.users.lock().await.register(posts.iter().map(|p| p.author_id));
        self.categories.lock().await.register(posts.iter().map(|p| p.category_id));
        self.comments_by_post.lock().await.register(posts.iter().map(|p| p.id));
    }

    pub async fn register_comments(&self, comments: &[Comment]) {
        self.users.lock().await.register(comments.iter().map(|c| c.author_id));
        self.posts.lock().await.register(comments.iter().map(|c| c.post_id));
    }

    pub async fn prime_user(&self, user: &User) {
        self.users.lock().await.prime(user.id, Some(user.clone()));
    }

    pub async fn prime_category(&self, category: &Category) {
        self.categories
            .lock()
            .await
            .prime(category.id, Some(category.clone()));
    }

    pub async fn prime_post(&self, post: &Post) {
        self.posts.lock().await.prime(post.id, Some(post.clone()));
    }
}
