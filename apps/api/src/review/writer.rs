//! Product Review Writer — a short seller-facing review and a longer,
//! subtitled customer-facing review. Single calls, no revision loop; rule
//! breaks are only logged.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, json_list, CLOSING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService, ModelProfile};
use crate::review::guide::ReviewGuide;
use crate::review::prompts::{
    review_context, CONCLUSION_SUBTITLE, DISCLOSURE_KEYWORD, PRODUCT_REVIEW_PROMPT_TEMPLATE,
    PRODUCT_REVIEW_SYSTEM_TEMPLATE, SELLER_REVIEW_PROMPT_TEMPLATE, SELLER_REVIEW_SYSTEM_TEMPLATE,
};

const SELLER_PROFILE: ModelProfile = ModelProfile::standard(1000);
const PRODUCT_PROFILE: ModelProfile = ModelProfile::standard(2000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub title: String,
    pub product_review: String,
    pub seller_review: String,
}

#[derive(Debug, Deserialize)]
struct ProductReviewResponse {
    review: String,
    title: String,
}

/// `## ` subtitles of a review, in order.
pub fn subtitles(review: &str) -> Vec<String> {
    review
        .lines()
        .filter_map(|line| line.strip_prefix("## "))
        .map(|s| s.trim().to_string())
        .collect()
}

/// Subtitles the product review must carry: the keywords, then the conclusion.
pub fn expected_subtitles(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_string())
        .chain(std::iter::once(CONCLUSION_SUBTITLE.to_string()))
        .collect()
}

pub async fn write_product_review(
    guide: &ReviewGuide,
    llm: &dyn CompletionService,
) -> Result<Review, AppError> {
    let keywords = guide.keywords()?;

    let seller_review = write_seller_review(guide, llm).await?;
    let product = write_customer_review(guide, keywords, llm).await?;

    let actual = subtitles(&product.review);
    if actual != expected_subtitles(keywords) {
        warn!(?actual, "Product review subtitles do not follow the keywords");
    }
    if !guide.sponsored
        && !product.title.contains(DISCLOSURE_KEYWORD)
        && !product.review.contains(DISCLOSURE_KEYWORD)
    {
        warn!("Unsponsored review does not surface {DISCLOSURE_KEYWORD:?}");
    }
    if seller_review.contains('#') {
        warn!("Seller review contains markdown");
    }

    info!("Product review written: {:?}", product.title);
    Ok(Review {
        title: product.title.trim().to_string(),
        product_review: product.review,
        seller_review,
    })
}

async fn write_seller_review(guide: &ReviewGuide, llm: &dyn CompletionService) -> Result<String, AppError> {
    let prompt = fill_template(
        SELLER_REVIEW_PROMPT_TEMPLATE,
        &[
            ("purchased_date", &guide.purchased_date.format("%Y-%m-%d").to_string()),
            ("arrived_date", &guide.arrived_date.format("%Y-%m-%d").to_string()),
            ("packaging_state", &guide.packaging_state),
        ],
    );
    let request = CompletionRequest::new(
        SELLER_PROFILE,
        SELLER_REVIEW_SYSTEM_TEMPLATE.replace("{closing}", CLOSING_INSTRUCTION),
        prompt,
    );

    let text = llm
        .complete(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Seller review failed: {e}")))?;
    Ok(text.trim().to_string())
}

async fn write_customer_review(
    guide: &ReviewGuide,
    keywords: &[String],
    llm: &dyn CompletionService,
) -> Result<ProductReviewResponse, AppError> {
    let system = PRODUCT_REVIEW_SYSTEM_TEMPLATE
        .replace("{max_length}", &guide.max_length.to_string())
        .replace("{conclusion}", CONCLUSION_SUBTITLE)
        .replace("{disclosure}", DISCLOSURE_KEYWORD)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{closing}", CLOSING_INSTRUCTION);
    let prompt = fill_template(
        PRODUCT_REVIEW_PROMPT_TEMPLATE,
        &[
            ("context", &review_context(guide)),
            ("keywords", &json_list(keywords)),
        ],
    );
    let request = CompletionRequest::new(PRODUCT_PROFILE, system, prompt).json();

    complete_json(llm, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Product review failed: {e}")))
}

#[cfg(test)]
pub(crate) fn product_review_json() -> String {
    serde_json::json!({
        "title": "내돈내산 기계식 키보드 입문기",
        "review": "## 내돈내산\n직접 샀어요!\n## 타건감\n경쾌했어요~\n## 결론\n입문용으로 좋아요!",
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::llm_client::ResponseFormat;
    use crate::review::guide::sample_review_guide;

    fn keywords() -> Vec<String> {
        vec!["내돈내산".to_string(), "타건감".to_string()]
    }

    #[test]
    fn test_subtitles_in_order() {
        let review = "## 내돈내산 \n본문\n### 작은 제목\n## 결론\n끝";
        assert_eq!(subtitles(review), vec!["내돈내산", "결론"]);
    }

    #[test]
    fn test_expected_subtitles_end_with_conclusion() {
        assert_eq!(expected_subtitles(&keywords()), vec!["내돈내산", "타건감", "결론"]);
    }

    #[tokio::test]
    async fn test_write_product_review_makes_two_calls() {
        let llm = ScriptedLlm::new(["잘 받았어요! 포장도 꼼꼼했어요~ 😊".to_string(), product_review_json()]);
        let guide = sample_review_guide().with_keywords(keywords()).unwrap();

        let review = write_product_review(&guide, &llm).await.unwrap();
        assert_eq!(review.title, "내돈내산 기계식 키보드 입문기");
        assert_eq!(subtitles(&review.product_review), expected_subtitles(&keywords()));
        assert!(!review.seller_review.contains('#'));

        let requests = llm.requests();
        assert_eq!(requests[0].format, ResponseFormat::Text);
        assert!(requests[0].user.contains("2025-02-01"));
        assert_eq!(requests[1].format, ResponseFormat::Json);
        assert!(requests[1].user.contains(r#"["내돈내산","타건감"]"#));
    }

    #[tokio::test]
    async fn test_keywords_required() {
        let llm = ScriptedLlm::new(Vec::<String>::new());
        let err = write_product_review(&sample_review_guide(), &llm).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.call_count(), 0);
    }
}
