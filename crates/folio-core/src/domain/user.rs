use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{self, ValidationErrors};

const NAME_MAX: usize = 100;

/// User entity - an author of posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The public slice of a user embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<User> for AuthorSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar_url: user.avatar_url,
        }
    }
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Validated partial update. `avatar_url: Some(None)` clears the avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub avatar_url: Option<Option<String>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar_url.is_none()
    }
}

/// Create-user payload as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserDraft {
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::required_text(&mut errors, "name", "Name", self.name, Some(NAME_MAX));
        if let Some(url) = &self.avatar_url {
            validation::check_url(&mut errors, "avatarUrl", url);
        }
        errors.finish(NewUser {
            name,
            avatar_url: self.avatar_url,
        })
    }
}

/// Update-user payload as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub avatar_url: Option<Option<String>>,
}

impl UserChanges {
    pub fn validate(self) -> Result<UserPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::optional_text(&mut errors, "name", "Name", self.name, Some(NAME_MAX));
        if let Some(Some(url)) = &self.avatar_url {
            validation::check_url(&mut errors, "avatarUrl", url);
        }
        errors.finish(UserPatch {
            name,
            avatar_url: self.avatar_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_requires_name_and_valid_url() {
        let errors = UserDraft {
            name: None,
            avatar_url: Some("not a url".into()),
        }
        .validate()
        .unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("avatarUrl").is_some());
    }

    #[test]
    fn test_changes_distinguish_null_from_absent() {
        let cleared: UserChanges = serde_json::from_str(r#"{"avatarUrl": null}"#).unwrap();
        assert_eq!(cleared.validate().unwrap().avatar_url, Some(None));

        let untouched: UserChanges = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        let patch = untouched.validate().unwrap();
        assert_eq!(patch.avatar_url, None);
        assert_eq!(patch.name.as_deref(), Some("Ada"));
    }
}
