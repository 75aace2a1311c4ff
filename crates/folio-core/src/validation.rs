//! Field-level validation for request payloads and query parameters.
//!
//! Payload types deserialize into loose "draft" shapes (every field optional) and
//! are checked here into the strict domain inputs, so a single request reports
//! every problem at once instead of failing on the first missing field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern is valid"));

/// Validation messages keyed by field name (camelCase, as clients send them).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error set holding a single message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fields with their messages, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Merge another error set into this one.
    pub fn extend(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a required text field against a length range (counted in characters).
///
/// `label` is the human name used in messages ("Name", "Title", ...).
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<String>,
    max: Option<usize>,
) -> String {
    match value {
        Some(value) => {
            check_text(errors, field, label, &value, max);
            value
        }
        None => {
            errors.add(field, format!("{label} is required"));
            String::new()
        }
    }
}

/// Check an optional text field; absent values pass.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<String>,
    max: Option<usize>,
) -> Option<String> {
    if let Some(value) = &value {
        check_text(errors, field, label, value, max);
    }
    value
}

fn check_text(errors: &mut ValidationErrors, field: &str, label: &str, value: &str, max: Option<usize>) {
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, format!("{label} is required"));
    } else if max.is_some_and(|max| len > max) {
        errors.add(field, format!("{label} too long"));
    }
}

/// Slugs are lowercase letters, digits and hyphens, at most 50 characters.
pub fn check_slug(errors: &mut ValidationErrors, field: &str, slug: &str) {
    if slug.is_empty() {
        return;
    }
    if slug.chars().count() > 50 {
        errors.add(field, "Slug too long");
    }
    if !SLUG_PATTERN.is_match(slug) {
        errors.add(
            field,
            "Slug can only contain lowercase letters, numbers, and hyphens",
        );
    }
}

pub fn check_url(errors: &mut ValidationErrors, field: &str, value: &str) {
    if url::Url::parse(value).is_err() {
        errors.add(field, "Invalid URL");
    }
}

/// Parse a hyphenated UUID, recording `message` on failure.
pub fn parse_uuid(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    message: &str,
) -> Option<Uuid> {
    match parse_id(value) {
        Some(id) => Some(id),
        None => {
            errors.add(field, message);
            None
        }
    }
}

/// Parse a path/argument identifier. Only the canonical hyphenated form is accepted.
pub fn parse_id(value: &str) -> Option<Uuid> {
    if value.len() != 36 {
        return None;
    }
    Uuid::parse_str(value).ok()
}

/// Like [`parse_uuid`] but for a field that must be present.
pub fn required_uuid(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    message: &str,
) -> Uuid {
    match value {
        Some(value) => parse_uuid(errors, field, value, message).unwrap_or_default(),
        None => {
            errors.add(field, message);
            Uuid::nil()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_reports_missing_and_too_long() {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "name", "Name", None, Some(100));
        required_text(&mut errors, "title", "Title", Some("x".repeat(201)), Some(200));
        assert_eq!(errors.get("name"), Some(&["Name is required".to_string()][..]));
        assert_eq!(errors.get("title"), Some(&["Title too long".to_string()][..]));
    }

    #[test]
    fn test_slug_rules() {
        let mut errors = ValidationErrors::new();
        check_slug(&mut errors, "slug", "rust-2024");
        assert!(errors.is_empty());

        check_slug(&mut errors, "slug", "Not A Slug");
        assert_eq!(errors.get("slug").map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_parse_id_requires_hyphenated_form() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id(&id.simple().to_string()), None);
        assert_eq!(parse_id("not-a-uuid"), None);
    }

    #[test]
    fn test_display_lists_every_message() {
        let mut errors = ValidationErrors::single("name", "Name is required");
        errors.add("avatarUrl", "Invalid URL");
        assert_eq!(errors.to_string(), "avatarUrl: Invalid URL, name: Name is required");
    }
}
