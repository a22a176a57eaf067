//! Prompt and trope catalogue rules.

use std::str::FromStr;

use crate::error::CoreError;

/// Maximum length of a prompt's text or a trope's description.
pub const MAX_TEXT_LENGTH: usize = 4000;

/// Maximum length of a category or trope name.
pub const MAX_LABEL_LENGTH: usize = 100;

/// Ordering for prompt and trope listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    /// Most served first.
    Popular,
    /// Newest first.
    #[default]
    Recent,
    Alphabetical,
}

impl FromStr for CatalogSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(CatalogSort::Popular),
            "recent" => Ok(CatalogSort::Recent),
            "alphabetical" | "alpha" => Ok(CatalogSort::Alphabetical),
            other => Err(CoreError::validation(format!(
                "Unknown sort '{other}', expected popular, recent or alphabetical"
            ))),
        }
    }
}

/// Categories are stored trimmed and lowercased.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Validate a required text field against a maximum length.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(CoreError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_recent() {
        assert_eq!(CatalogSort::default(), CatalogSort::Recent);
        assert_eq!("popular".parse::<CatalogSort>().unwrap(), CatalogSort::Popular);
        assert!("random".parse::<CatalogSort>().is_err());
    }

    #[test]
    fn categories_are_normalized() {
        assert_eq!(normalize_category("  Horror "), "horror");
    }

    #[test]
    fn text_validation() {
        assert!(validate_text("prompt_text", "A door opens.", MAX_TEXT_LENGTH).is_ok());
        assert!(validate_text("prompt_text", "  ", MAX_TEXT_LENGTH).is_err());
        assert!(validate_text("name", &"x".repeat(101), MAX_LABEL_LENGTH).is_err());
    }
}
