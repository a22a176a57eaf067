//! Shared query parameter types for API handlers.

use cyarika_core::error::CoreError;
use cyarika_core::prompts::{normalize_category, CatalogSort};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `cyarika_core::pagination` before reaching SQL.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?category=&sort=` for prompt and trope listings.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub sort: Option<String>,
}

impl CatalogParams {
    /// Normalized category filter and parsed sort order.
    pub fn parse(&self) -> Result<(Option<String>, CatalogSort), CoreError> {
        let sort = match self.sort.as_deref() {
            Some(s) if !s.trim().is_empty() => s.trim().parse()?,
            _ => CatalogSort::default(),
        };
        Ok((category_filter(self.category.as_deref()), sort))
    }
}

/// `?category=` for random prompt/trope serving.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryParams {
    pub category: Option<String>,
}

impl CategoryParams {
    pub fn category(&self) -> Option<String> {
        category_filter(self.category.as_deref())
    }
}

/// Blank categories mean "no filter".
fn category_filter(category: Option<&str>) -> Option<String> {
    category
        .map(normalize_category)
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_defaults_to_recent_without_filter() {
        let (category, sort) = CatalogParams::default().parse().unwrap();
        assert_eq!(category, None);
        assert_eq!(sort, CatalogSort::Recent);
    }

    #[test]
    fn catalog_normalizes_category_and_parses_sort() {
        let params = CatalogParams {
            category: Some("  Horror ".into()),
            sort: Some("popular".into()),
        };
        let (category, sort) = params.parse().unwrap();
        assert_eq!(category.as_deref(), Some("horror"));
        assert_eq!(sort, CatalogSort::Popular);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let params = CatalogParams {
            category: None,
            sort: Some("loudest".into()),
        };
        assert!(params.parse().is_err());
    }

    #[test]
    fn blank_category_is_no_filter() {
        let params = CategoryParams {
            category: Some("   ".into()),
        };
        assert_eq!(params.category(), None);
    }
}
