//! Axum route handlers for the Post API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::post::generator::{generate_post, GeneratedPost};
use crate::post::guide::PostGuide;
use crate::post::restaurant::find_restaurant;
use crate::render::render_post;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A list field from the form: either a JSON array or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    Csv(String),
}

impl ListInput {
    /// Trimmed items with empties dropped.
    pub fn into_items(self) -> Vec<String> {
        let items: Vec<String> = match self {
            ListInput::Items(items) => items,
            ListInput::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub review: String,
    pub max_length: u32,
    pub keywords: ListInput,
    pub foods: ListInput,
    /// Deprecated override; when blank the restaurant is resolved from the title.
    #[serde(default)]
    pub restaurant: Option<String>,
}

impl PostRequest {
    pub fn into_guide(self) -> Result<(PostGuide, Option<String>), AppError> {
        let guide = PostGuide::new(
            self.title,
            self.review,
            self.max_length,
            self.keywords.into_items(),
            self.foods.into_items(),
        )?;
        Ok((guide, self.restaurant))
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: GeneratedPost,
    pub markdown: String,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub restaurant: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/posts
///
/// Full pipeline: resolve restaurant → plan → write → review → revise → hashtags.
pub async fn handle_generate_post(
    State(state): State<AppState>,
    Json(request): Json<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let (guide, restaurant_override) = request.into_guide()?;

    let post = generate_post(guide, restaurant_override, state.llm.as_ref(), state.revision).await?;
    let markdown = render_post(&post.title, &post.post, &post.hashtags);

    Ok(Json(PostResponse { post, markdown }))
}

/// POST /api/v1/posts/restaurant
///
/// Previews restaurant resolution for a title.
pub async fn handle_find_restaurant(
    State(state): State<AppState>,
    Json(request): Json<RestaurantRequest>,
) -> Result<Json<RestaurantResponse>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let restaurant = find_restaurant(&request.title, state.llm.as_ref()).await?;
    Ok(Json(RestaurantResponse { restaurant }))
}
