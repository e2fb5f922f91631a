//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use meridian_client::services::ProductFilter;
use meridian_core::{Category, Product};

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::PageContext;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Display the home page: first page of the catalog plus the category rail.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let filter = ProductFilter::default();
    let (page, categories) = tokio::join!(
        state.catalog().products(&filter),
        state.catalog().categories()
    );

    Ok(HomeTemplate {
        ctx: PageContext::build(&state, &session, user).await,
        products: page?.items,
        categories: categories?,
    })
}
