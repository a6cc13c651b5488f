//! Axum route handlers for the Review API.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::render::render_review;
use crate::review::generator::{generate_review, GeneratedReview};
use crate::review::guide::ReviewGuide;
use crate::review::keywords::extract_keywords;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub category: String,
    pub product: String,
    pub score: u8,
    pub max_length: u32,
    pub positive_review: String,
    pub negative_review: String,
    #[serde(default)]
    pub sponsored: bool,
    /// `YYYY-MM-DD`
    pub purchased_date: String,
    /// `YYYY-MM-DD`
    pub arrived_date: String,
    pub packaging_state: String,
}

impl ReviewRequest {
    pub fn into_guide(self) -> Result<ReviewGuide, AppError> {
        let guide = ReviewGuide {
            category: self.category.trim().to_string(),
            product: self.product.trim().to_string(),
            score: self.score,
            max_length: self.max_length,
            positive_review: self.positive_review,
            negative_review: self.negative_review,
            sponsored: self.sponsored,
            purchased_date: parse_date("purchased_date", &self.purchased_date)?,
            arrived_date: parse_date("arrived_date", &self.arrived_date)?,
            packaging_state: self.packaging_state,
            keywords: None,
        };
        guide.validate()?;
        Ok(guide)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} must be a YYYY-MM-DD date, got {value:?}")))
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    #[serde(flatten)]
    pub review: GeneratedReview,
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reviews
///
/// Extracts keywords, then writes the seller and product reviews.
pub async fn handle_generate_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let guide = request.into_guide()?;

    let review = generate_review(guide, state.llm.as_ref(), state.revision).await?;
    let markdown = render_review(&review.review);

    Ok(Json(ReviewResponse { review, markdown }))
}

/// POST /api/v1/reviews/keywords
pub async fn handle_extract_keywords(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let guide = request.into_guide()?;

    let keywords = extract_keywords(&guide, state.llm.as_ref(), state.revision).await?;
    Ok(Json(KeywordsResponse { keywords }))
}
