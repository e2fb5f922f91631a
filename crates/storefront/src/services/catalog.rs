//! Cached catalog reads.
//!
//! Catalog endpoints are public and read-heavy, so the storefront keeps
//! a short-lived in-memory cache (5-minute TTL) in front of them. Only
//! reads are cached; every mutation elsewhere round-trips directly.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use meridian_client::services::{ProductFilter, ProductPage};
use meridian_client::{ApiError, Client};
use meridian_core::{Category, Product};

/// Cached value variants. One cache holds all catalog reads; the key
/// prefix keeps the variants apart.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Page(Box<ProductPage>),
    Categories(Vec<Category>),
}

/// Catalog reads through a shared anonymous client, cached for 5 minutes.
pub struct CatalogCache {
    client: Client,
    cache: Cache<String, CacheValue>,
}

impl CatalogCache {
    /// Create a cache in front of the given (anonymous) client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { client, cache }
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self))]
    pub async fn product(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product = self.client.catalog().get_product(slug).await?;

        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a page of the product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<ProductPage, ApiError> {
        let cache_key = format!(
            "products:{}:{}:{}",
            filter.search.as_deref().unwrap_or(""),
            filter.category.as_deref().unwrap_or(""),
            filter.page.unwrap_or(1)
        );

        if let Some(CacheValue::Page(page)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product listing");
            return Ok(*page);
        }

        let page = self.client.catalog().list_products(filter).await?;

        self.cache
            .insert(cache_key, CacheValue::Page(Box::new(page.clone())))
            .await;

        Ok(page)
    }

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.cache.get(&cache_key).await {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories = self.client.catalog().list_categories().await?;

        self.cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }
}
