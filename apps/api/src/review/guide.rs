//! ReviewGuide — the request-scoped description of a product review.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MAX_SCORE: u8 = 5;
pub const MIN_REVIEW_LENGTH: u32 = 500;
pub const MAX_REVIEW_LENGTH: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewGuide {
    pub category: String,
    pub product: String,
    /// 0 (worst) to 5 (best).
    pub score: u8,
    pub max_length: u32,
    pub positive_review: String,
    pub negative_review: String,
    pub sponsored: bool,
    /// Serialized as `YYYY-MM-DD`.
    pub purchased_date: NaiveDate,
    pub arrived_date: NaiveDate,
    pub packaging_state: String,
    /// `None` until keyword extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl ReviewGuide {
    /// Rejects blank text fields and out-of-range numbers.
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("category", &self.category),
            ("product", &self.product),
            ("positive_review", &self.positive_review),
            ("negative_review", &self.negative_review),
            ("packaging_state", &self.packaging_state),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::Validation(format!("{name} cannot be empty")));
        }
        if self.score > MAX_SCORE {
            return Err(AppError::Validation(format!(
                "score must be between 0 and {MAX_SCORE}, got {}",
                self.score
            )));
        }
        if !(MIN_REVIEW_LENGTH..=MAX_REVIEW_LENGTH).contains(&self.max_length) {
            return Err(AppError::Validation(format!(
                "max_length must be between {MIN_REVIEW_LENGTH} and {MAX_REVIEW_LENGTH}, got {}",
                self.max_length
            )));
        }
        Ok(())
    }

    /// Returns a copy of this guide carrying the extracted keywords.
    /// Keywords are attached exactly once.
    pub fn with_keywords(&self, keywords: Vec<String>) -> Result<Self, AppError> {
        if self.keywords.is_some() {
            return Err(AppError::Validation(
                "keywords are already attached to this review".to_string(),
            ));
        }
        Ok(Self {
            keywords: Some(keywords),
            ..self.clone()
        })
    }

    /// The extracted keywords. Every review writer goes through this accessor.
    pub fn keywords(&self) -> Result<&[String], AppError> {
        self.keywords.as_deref().ok_or_else(|| {
            AppError::Validation("keywords must be extracted before writing".to_string())
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_review_guide() -> ReviewGuide {
    ReviewGuide {
        category: "전자제품".to_string(),
        product: "앱코 K517 레트로 기계식 (적축)".to_string(),
        score: 4,
        max_length: 1000,
        positive_review: "기계식 키보드 입문용으로 좋습니다".to_string(),
        negative_review: "유선키보드라 조금 불편합니다".to_string(),
        sponsored: false,
        purchased_date: NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
        arrived_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        packaging_state: "good".to_string(),
        keywords: None,
    }
}
