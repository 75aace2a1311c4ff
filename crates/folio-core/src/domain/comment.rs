use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorSummary;
use crate::validation::{self, ValidationErrors};

const CONTENT_MAX: usize = 1000;

/// Comment entity - a user's reply on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<AuthorSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl CommentPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

impl CommentDraft {
    pub fn validate(self) -> Result<NewComment, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let content =
            validation::required_text(&mut errors, "content", "Content", self.content, Some(CONTENT_MAX));
        let post_id =
            validation::required_uuid(&mut errors, "postId", self.post_id.as_deref(), "Invalid post ID");
        let author_id = validation::required_uuid(
            &mut errors,
            "authorId",
            self.author_id.as_deref(),
            "Invalid author ID",
        );
        errors.finish(NewComment {
            content,
            post_id,
            author_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentChanges {
    #[serde(default)]
    pub content: Option<String>,
}

impl CommentChanges {
    pub fn validate(self) -> Result<CommentPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let content =
            validation::optional_text(&mut errors, "content", "Content", self.content, Some(CONTENT_MAX));
        errors.finish(CommentPatch { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_limit() {
        let draft = CommentDraft {
            content: Some("x".repeat(1001)),
            post_id: Some(Uuid::new_v4().to_string()),
            author_id: Some(Uuid::new_v4().to_string()),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("content"), Some(&["Content too long".to_string()][..]));
    }
}
