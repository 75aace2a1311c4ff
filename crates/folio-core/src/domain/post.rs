use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSummary, Category, CommentWithAuthor};
use crate::validation::{self, ValidationErrors};

const TITLE_MAX: usize = 200;

/// Post entity - an article written by a user inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A post with its author and category embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithRelations {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorSummary>,
    pub category: Option<Category>,
}

/// A single post with author, category and its comments (oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorSummary>,
    pub category: Option<Category>,
    pub comments: Vec<CommentWithAuthor>,
}

/// Optional filters for post listings; all given filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub category_slug: Option<String>,
}

impl PostFilter {
    pub fn by_category(category_id: Uuid) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    /// Validate raw filter values (ids arrive as strings).
    pub fn parse(
        published: Option<bool>,
        author_id: Option<&str>,
        category_id: Option<&str>,
        category_slug: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let author_id = author_id
            .and_then(|id| validation::parse_uuid(&mut errors, "authorId", id, "Invalid author ID"));
        let category_id = category_id.and_then(|id| {
            validation::parse_uuid(&mut errors, "categoryId", id, "Invalid category ID")
        });
        errors.finish(Self {
            published,
            author_id,
            category_id,
            category_slug,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub author_id: Uuid,
    pub category_id: Uuid,
}

/// Partial post update. The author of a post cannot be reassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.published.is_none()
            && self.category_id.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl PostDraft {
    pub fn validate(self) -> Result<NewPost, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = validation::required_text(&mut errors, "title", "Title", self.title, Some(TITLE_MAX));
        let content = validation::required_text(&mut errors, "content", "Content", self.content, None);
        let author_id = validation::required_uuid(
            &mut errors,
            "authorId",
            self.author_id.as_deref(),
            "Invalid author ID",
        );
        let category_id = validation::required_uuid(
            &mut errors,
            "categoryId",
            self.category_id.as_deref(),
            "Invalid category ID",
        );
        errors.finish(NewPost {
            title,
            content,
            published: self.published.unwrap_or(false),
            author_id,
            category_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl PostChanges {
    pub fn validate(self) -> Result<PostPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = validation::optional_text(&mut errors, "title", "Title", self.title, Some(TITLE_MAX));
        let content = validation::optional_text(&mut errors, "content", "Content", self.content, None);
        let category_id = self.category_id.as_deref().and_then(|id| {
            validation::parse_uuid(&mut errors, "categoryId", id, "Invalid category ID")
        });
        errors.finish(PostPatch {
            title,
            content,
            published: self.published,
            category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_to_unpublished() {
        let post = PostDraft {
            title: Some("Hello".into()),
            content: Some("World".into()),
            published: None,
            author_id: Some(Uuid::new_v4().to_string()),
            category_id: Some(Uuid::new_v4().to_string()),
        }
        .validate()
        .unwrap();
        assert!(!post.published);
    }

    #[test]
    fn test_draft_reports_every_bad_field() {
        let errors = PostDraft {
            title: Some(String::new()),
            content: None,
            published: Some(true),
            author_id: Some("42".into()),
            category_id: None,
        }
        .validate()
        .unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["authorId", "categoryId", "content", "title"]);
    }

    #[test]
    fn test_filter_rejects_malformed_ids() {
        assert!(PostFilter::parse(None, Some("abc"), None, None).is_err());
        let id = Uuid::new_v4();
        let filter = PostFilter::parse(Some(true), None, Some(&id.to_string()), None).unwrap();
        assert_eq!(filter.category_id, Some(id));
        assert_eq!(filter.published, Some(true));
    }

    #[test]
    fn test_embedded_post_serializes_flat() {
        let post = Post {
            id: Uuid::nil(),
            title: "t".into(),
            content: "c".into(),
            published: false,
            author_id: Uuid::nil(),
            category_id: Uuid::nil(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(PostWithRelations {
            post,
            author: None,
            category: None,
        })
        .unwrap();
        assert_eq!(json["title"], "t");
        assert!(json.get("authorId").is_some());
        assert!(json["author"].is_null());
    }
}
