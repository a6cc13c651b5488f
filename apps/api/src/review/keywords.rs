//! Keyword Extractor — 2 to 5 short keywords that become the review's subtitles.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{CLOSING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService, ModelProfile};
use crate::review::guide::ReviewGuide;
use crate::review::prompts::{
    review_context, BLANK_KEYWORD_CORRECTION, DISCLOSURE_KEYWORD, DISCLOSURE_MISSING_TEMPLATE, KEYWORDS_SYSTEM_TEMPLATE,
    KEYWORD_COUNT_TEMPLATE, MAX_KEYWORDS, MIN_KEYWORDS,
};
use crate::revision::{revise_json, RevisionPolicy, Verdict};

const PROFILE: ModelProfile = ModelProfile::standard(200);

#[derive(Debug, Deserialize)]
struct KeywordsResponse {
    keywords: Vec<String>,
}

/// Keywords must be non-blank and in range, and unsponsored reviews must
/// include the disclosure marker.
fn check_keywords(keywords: &[String], sponsored: bool) -> Verdict {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(BLANK_KEYWORD_CORRECTION.to_string());
    }
    if !(MIN_KEYWORDS..=MAX_KEYWORDS).contains(&keywords.len()) {
        return Err(KEYWORD_COUNT_TEMPLATE
            .replace("{count}", &keywords.len().to_string())
            .replace("{min}", &MIN_KEYWORDS.to_string())
            .replace("{max}", &MAX_KEYWORDS.to_string()));
    }
    if !sponsored && !keywords.iter().any(|k| k.trim() == DISCLOSURE_KEYWORD) {
        return Err(DISCLOSURE_MISSING_TEMPLATE.replace("{disclosure}", DISCLOSURE_KEYWORD));
    }
    Ok(())
}

/// Extracts the review's keywords, revising replies that break the count or
/// disclosure rule.
pub async fn extract_keywords(
    guide: &ReviewGuide,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<Vec<String>, AppError> {
    let system = KEYWORDS_SYSTEM_TEMPLATE
        .replace("{disclosure}", DISCLOSURE_KEYWORD)
        .replace("{min}", &MIN_KEYWORDS.to_string())
        .replace("{max}", &MAX_KEYWORDS.to_string())
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{closing}", CLOSING_INSTRUCTION);

    let request = CompletionRequest::new(PROFILE, system, review_context(guide)).json();

    let response: KeywordsResponse = revise_json(llm, request, policy, "keyword extraction", |r: &KeywordsResponse| {
        check_keywords(&r.keywords, guide.sponsored)
    })
    .await?;

    let keywords: Vec<String> = response
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .collect();
    info!("Extracted keywords: {:?}", keywords);
    Ok(keywords)
}
