//! Product and category reads.

use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use meridian_core::{Category, Product};

use crate::client::Client;
use crate::endpoints;
use crate::error::ApiError;

/// Query parameters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Free-text search query.
    pub search: Option<String>,
    /// Category slug to filter by.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl ProductFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

/// One page of the product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub items: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl ProductPage {
    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Catalog reads. All endpoints are public; no token is required.
pub struct CatalogService<'a> {
    client: &'a Client,
}

impl<'a> CatalogService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List products matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter), fields(search = ?filter.search, category = ?filter.category, page = ?filter.page))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, ApiError> {
        let query = filter.query();
        self.client
            .request_json(Method::GET, endpoints::PRODUCTS, Some(&query), None)
            .await
    }

    /// Fetch a single product by slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no product has this slug.
    #[instrument(skip(self))]
    pub async fn get_product(&self, slug: &str) -> Result<Product, ApiError> {
        self.client
            .request_json(Method::GET, &endpoints::product(slug), None, None)
            .await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client
            .request_json(Method::GET, endpoints::CATEGORIES, None, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_skips_empty() {
        let filter = ProductFilter::default();
        assert!(filter.query().is_empty());

        let filter = ProductFilter {
            search: Some("mug".to_owned()),
            category: None,
            page: Some(2),
        };
        assert_eq!(
            filter.query(),
            vec![("search", "mug".to_owned()), ("page", "2".to_owned())]
        );
    }

    #[test]
    fn test_page_navigation() {
        let page = ProductPage {
            items: Vec::new(),
            page: 2,
            total_pages: 3,
            total: 50,
        };
        assert!(page.has_next());
        assert!(page.has_prev());

        let last = ProductPage {
            items: Vec::new(),
            page: 3,
            total_pages: 3,
            total: 50,
        };
        assert!(!last.has_next());
    }
}
