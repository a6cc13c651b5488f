// All LLM prompt constants for the product review pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::fill_template;
use crate::review::guide::ReviewGuide;

/// Keyword marking a self-paid (not sponsored) review.
pub const DISCLOSURE_KEYWORD: &str = "내돈내산";

/// Mandatory last subtitle of the product review.
pub const CONCLUSION_SUBTITLE: &str = "결론";

pub const MIN_KEYWORDS: usize = 2;
pub const MAX_KEYWORDS: usize = 5;

/// Replace `{category}`, `{product}`, `{score}`, `{positive_review}`,
/// `{negative_review}`, `{sponsored}`, `{purchased_date}`, `{arrived_date}`,
/// `{packaging_state}`.
pub const REVIEW_CONTEXT_TEMPLATE: &str = "\
Product's category is here.\n\
{category}\n\
---\n\
Product's name is here.\n\
{product}\n\
---\n\
Review score is here. The score is between 0 (worst) and 5 (best).\n\
{score}\n\
---\n\
Product's positive review is here.\n\
{positive_review}\n\
---\n\
Product's negative review is here.\n\
{negative_review}\n\
---\n\
Whether it is an advertisement or not is here.\n\
{sponsored}\n\
---\n\
Purchased date is here.\n\
{purchased_date}\n\
---\n\
Arrived date is here.\n\
{arrived_date}\n\
---\n\
Packaging state is here.\n\
{packaging_state}";

/// Renders `REVIEW_CONTEXT_TEMPLATE` for a guide. Dates render as `YYYY-MM-DD`.
pub fn review_context(guide: &ReviewGuide) -> String {
    fill_template(
        REVIEW_CONTEXT_TEMPLATE,
        &[
            ("category", &guide.category),
            ("product", &guide.product),
            ("score", &guide.score.to_string()),
            ("positive_review", &guide.positive_review),
            ("negative_review", &guide.negative_review),
            ("sponsored", &guide.sponsored.to_string()),
            ("purchased_date", &guide.purchased_date.format("%Y-%m-%d").to_string()),
            ("arrived_date", &guide.arrived_date.format("%Y-%m-%d").to_string()),
            ("packaging_state", &guide.packaging_state),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword extraction
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{disclosure}`, `{min}`, `{max}`, `{json_only}`, `{closing}`.
pub const KEYWORDS_SYSTEM_TEMPLATE: &str = "\
As a product reviewer, your task is to extract attractive keywords from a review request.\n\
---\n\
Please follow these guidelines ordered by their priorities.\n\
1. Keywords should represent the core of the request. They are used as subtitles of the review.\n\
2. Keywords should be short terms.\n\
3. Extract between {min} and {max} keywords.\n\
4. If the request is NOT an advertisement, \"{disclosure}\" MUST be one of the keywords.\n\
---\n\
Return a JSON object with this EXACT schema:\n\
{\"keywords\": [\"...\"]}\n\
{json_only}\n\
---\n\
{closing}";

/// Replace `{count}`, `{min}`, `{max}`.
pub const KEYWORD_COUNT_TEMPLATE: &str = "\
The keywords above violate the guideline: there are {count}, but there MUST be between {min} and {max}. \
Please return corrected keywords as JSON with the same schema.";

/// Keywords become subtitles, so none may be blank.
pub const BLANK_KEYWORD_CORRECTION: &str = "\
The keywords above violate the guideline: some keywords are empty. \
Every keyword MUST be a short, non-empty term. \
Please return corrected keywords as JSON with the same schema.";

/// Replace `{disclosure}`.
pub const DISCLOSURE_MISSING_TEMPLATE: &str = "\
The request is not an advertisement, so \"{disclosure}\" MUST be one of the keywords. \
Please return corrected keywords as JSON with the same schema.";

// ────────────────────────────────────────────────────────────────────────────
// Seller review
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{closing}`.
pub const SELLER_REVIEW_SYSTEM_TEMPLATE: &str = "\
As a product reviewer, your task is to write a short review of the purchase for its seller.\n\
---\n\
Please follow these guidelines.\n\
- The review should be attractive.\n\
- The review should be written in Korean and in the past tense.\n\
- The review MUST be PLAIN TEXT, not markdown. Do NOT use \"#\".\n\
- The review should use emojis and punctuation marks like !, ~, etc.\n\
- The review's word count should be less than 300 words.\n\
---\n\
{closing}";

/// Replace `{purchased_date}`, `{arrived_date}`, `{packaging_state}`.
pub const SELLER_REVIEW_PROMPT_TEMPLATE: &str = "\
Purchased date is here.\n\
{purchased_date}\n\
---\n\
Arrived date is here.\n\
{arrived_date}\n\
---\n\
Packaging state is here.\n\
{packaging_state}";

// ────────────────────────────────────────────────────────────────────────────
// Product review
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{max_length}`, `{conclusion}`, `{disclosure}`, `{json_only}`, `{closing}`.
pub const PRODUCT_REVIEW_SYSTEM_TEMPLATE: &str = "\
As a product reviewer, your task is to write a product review for other customers.\n\
---\n\
Please follow these guidelines.\n\
- The review should be attractive.\n\
- The review should be written in Korean and in the past tense.\n\
- The review's word count should be less than {max_length}.\n\
- The keywords MUST be used as subtitles, in their given order.\n\
- The last subtitle MUST be \"{conclusion}\".\n\
- The review should end with comments that attract readers to buy the product.\n\
- The review should use emojis and punctuation marks like !, ~, etc.\n\
- Positive and negative reviews should be mixed.\n\
- The title should summarize the review as a phrase, not a sentence.\n\
- If the request is NOT an advertisement, the title MUST emphasize \"{disclosure}\".\n\
---\n\
Every section of the review MUST use this format:\n\
## {subtitle}\n\
{paragraph}\n\
---\n\
Return a JSON object with this EXACT schema:\n\
{\"review\": \"...\", \"title\": \"...\"}\n\
{json_only}\n\
---\n\
{closing}";

/// Replace `{context}`, `{keywords}`.
pub const PRODUCT_REVIEW_PROMPT_TEMPLATE: &str = "\
{context}\n\
---\n\
Review's keywords are here.\n\
{keywords}";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::guide::sample_review_guide;

    #[test]
    fn test_review_context_fills_every_field() {
        let context = review_context(&sample_review_guide());
        assert!(!context.contains('{'));
        assert!(context.contains("2025-01-25"));
        assert!(context.contains("앱코 K517"));
        assert!(context.contains("\nfalse\n"));
    }

    #[test]
    fn test_review_context_keeps_braces_in_user_text() {
        let mut guide = sample_review_guide();
        guide.category = "{product}".to_string();
        let context = review_context(&guide);
        assert!(context.contains("here.\n{product}\n---"));
        assert!(context.contains("앱코 K517"));
    }
}
