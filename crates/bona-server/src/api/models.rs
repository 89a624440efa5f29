//! Category catalog endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;
use bona_core::Category;

/// Response for the category list
#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryEntry>,
}

#[derive(Serialize)]
pub struct CategoryEntry {
    pub name: &'static str,
    pub alias: &'static str,
    /// Artifact location relative to the weights directory
    pub artifact: String,
    pub loaded: bool,
}

/// List selectable inference categories and their load state
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let mut categories = Vec::with_capacity(Category::all().len());
    for category in Category::all() {
        categories.push(CategoryEntry {
            name: category.name(),
            alias: category.alias(),
            artifact: category.weights_file().display().to_string(),
            loaded: state.engine.registry().get(*category).await.is_some(),
        });
    }
    Json(CategoriesResponse { categories })
}
