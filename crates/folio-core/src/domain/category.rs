use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{self, ValidationErrors};

const NAME_MAX: usize = 50;

/// Category entity - groups posts under a unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl CategoryDraft {
    pub fn validate(self) -> Result<NewCategory, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::required_text(&mut errors, "name", "Name", self.name, Some(NAME_MAX));
        let slug = validation::required_text(&mut errors, "slug", "Slug", self.slug, None);
        validation::check_slug(&mut errors, "slug", &slug);
        errors.finish(NewCategory { name, slug })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl CategoryChanges {
    pub fn validate(self) -> Result<CategoryPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::optional_text(&mut errors, "name", "Name", self.name, Some(NAME_MAX));
        let slug = validation::optional_text(&mut errors, "slug", "Slug", self.slug, None);
        if let Some(slug) = &slug {
            validation::check_slug(&mut errors, "slug", slug);
        }
        errors.finish(CategoryPatch { name, slug })
    }
}
