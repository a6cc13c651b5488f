//! PostGuide — the request-scoped description of a food blog post.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Allowed range for a post's `max_length`, mirroring the form limits.
pub const MIN_POST_LENGTH: u32 = 500;
pub const MAX_POST_LENGTH: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostGuide {
    pub title: String,
    pub review: String,
    /// Target length of the finished post, in characters.
    pub max_length: u32,
    pub keywords: Vec<String>,
    pub foods: Vec<String>,
    /// `None` until the restaurant is resolved.
    pub restaurant: Option<String>,
}

impl PostGuide {
    /// Builds an unresolved guide, rejecting blank fields and out-of-range lengths.
    pub fn new(
        title: String,
        review: String,
        max_length: u32,
        keywords: Vec<String>,
        foods: Vec<String>,
    ) -> Result<Self, AppError> {
        if title.trim().is_empty() || review.trim().is_empty() {
            return Err(AppError::Validation(
                "title and review cannot be empty".to_string(),
            ));
        }
        if !(MIN_POST_LENGTH..=MAX_POST_LENGTH).contains(&max_length) {
            return Err(AppError::Validation(format!(
                "max_length must be between {MIN_POST_LENGTH} and {MAX_POST_LENGTH}, got {max_length}"
            )));
        }
        if keywords.is_empty() || foods.is_empty() {
            return Err(AppError::Validation(
                "keywords and foods need at least one item each".to_string(),
            ));
        }

        Ok(Self {
            title,
            review,
            max_length,
            keywords,
            foods,
            restaurant: None,
        })
    }

    /// Returns a copy of this guide with the restaurant resolved.
    ///
    /// The name is trimmed; a blank name is an empty extraction. A guide
    /// resolves exactly once.
    pub fn with_restaurant(&self, restaurant: &str) -> Result<Self, AppError> {
        if let Some(existing) = &self.restaurant {
            return Err(AppError::Validation(format!(
                "restaurant is already resolved to {existing:?}"
            )));
        }
        let restaurant = restaurant.trim();
        if restaurant.is_empty() {
            return Err(AppError::EmptyExtraction("restaurant".to_string()));
        }

        Ok(Self {
            restaurant: Some(restaurant.to_string()),
            ..self.clone()
        })
    }

    /// The resolved restaurant. Every writer goes through this accessor.
    pub fn restaurant(&self) -> Result<&str, AppError> {
        self.restaurant.as_deref().ok_or_else(|| {
            AppError::Validation("restaurant must be resolved before writing".to_string())
        })
    }

    /// Allowed band for the sum of a plan's target lengths.
    pub fn length_band(&self) -> std::ops::RangeInclusive<u32> {
        self.max_length.saturating_sub(100)..=self.max_length + 100
    }
}

#[cfg(test)]
pub(crate) fn sample_guide() -> PostGuide {
    PostGuide::new(
        "서울의 \"소고기 천국\" 다녀왔어요!".to_string(),
        "정말 맛있는 소고기를 직접 구워주셨습니다!".to_string(),
        1500,
        vec!["숯불".to_string(), "직화".to_string(), "맛집".to_string()],
        vec!["소고기".to_string(), "냉면".to_string()],
    )
    .unwrap()
}
