//! Product listing and detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meridian_client::services::{ProductFilter, ProductPage};
use meridian_core::{Category, Product};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::PageContext;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
}

impl IndexQuery {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
            category: self.category.clone().filter(|c| !c.is_empty()),
            page: self.page,
        }
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub ctx: PageContext,
    pub page: ProductPage,
    pub categories: Vec<Category>,
    pub search: String,
    pub category: String,
    pub prev_page: u32,
    pub next_page: u32,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub ctx: PageContext,
    pub product: Product,
}

/// Display the product listing with search, category filter, and paging.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<IndexQuery>,
) -> Result<ProductIndexTemplate> {
    let filter = query.filter();
    let (page, categories) = tokio::join!(
        state.catalog().products(&filter),
        state.catalog().categories()
    );

    let page = page?;
    Ok(ProductIndexTemplate {
        ctx: PageContext::build(&state, &session, user).await,
        prev_page: page.page.saturating_sub(1).max(1),
        next_page: (page.page + 1).min(page.total_pages.max(1)),
        page,
        categories: categories?,
        search: filter.search.unwrap_or_default(),
        category: filter.category.unwrap_or_default(),
    })
}

/// Display a product detail page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = state.catalog().product(&slug).await?;

    // Deactivated products stay fetchable through the API for order
    // history, but have no public page.
    if !product.is_active {
        return Err(AppError::NotFound(format!("product {slug}")));
    }

    Ok(ProductShowTemplate {
        ctx: PageContext::build(&state, &session, user).await,
        product,
    })
}
