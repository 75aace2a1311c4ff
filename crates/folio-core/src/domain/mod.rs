//! Domain entities - the core content objects and their write payloads.
//!
//! Each entity comes with three shapes:
//! - the stored entity (`User`, `Post`, ...),
//! - a loose, client-facing draft (`UserDraft`, `UserChanges`) that deserializes
//!   whatever the client sent,
//! - the validated insert/patch (`NewUser`, `UserPatch`) produced by `validate()`.

mod category;
mod comment;
mod post;
mod user;

pub use category::{Category, CategoryChanges, CategoryDraft, CategoryPatch, NewCategory};
pub use comment::{Comment, CommentChanges, CommentDraft, CommentPatch, CommentWithAuthor, NewComment};
pub use post::{NewPost, Post, PostChanges, PostDetail, PostDraft, PostFilter, PostPatch, PostWithRelations};
pub use user::{AuthorSummary, NewUser, User, UserChanges, UserDraft, UserPatch};

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
