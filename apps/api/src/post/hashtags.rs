//! Hashtag Composer — generated hashtags topped up with the guide's keywords.
//!
//! The list is capped at `MAX_HASHTAGS`. The LLM is asked for
//! `MAX_HASHTAGS - keywords.len()` tags and the keywords fill the rest, so
//! every keyword appears as long as there are fewer than `MAX_HASHTAGS` of
//! them. Duplicates are kept.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, CLOSING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService, ModelProfile};
use crate::post::guide::PostGuide;
use crate::post::prompts::{HASHTAG_PROMPT_TEMPLATE, HASHTAG_SYSTEM_TEMPLATE};

const PROFILE: ModelProfile = ModelProfile::standard(500);
pub const MAX_HASHTAGS: usize = 20;

#[derive(Debug, Deserialize)]
struct HashtagResponse {
    hashtags: Vec<String>,
}

/// `#`-prefixed form of a tag; surrounding `#` and spaces are dropped first.
pub fn to_hashtag(tag: &str) -> String {
    format!("#{}", tag.trim_matches(|c| c == '#' || c == ' '))
}

/// How many hashtags the LLM should generate.
pub fn generated_count(keywords: &[String]) -> usize {
    MAX_HASHTAGS.saturating_sub(keywords.len())
}

/// Appends keyword hashtags to the generated ones, up to `MAX_HASHTAGS` total.
pub fn merge_hashtags(generated: Vec<String>, keywords: &[String]) -> Vec<String> {
    let room = MAX_HASHTAGS.saturating_sub(generated.len());
    let mut hashtags = generated;
    hashtags.extend(keywords.iter().take(room).map(|k| to_hashtag(k)));
    hashtags
}

/// Writes the hashtag list for a finished post.
///
/// With `MAX_HASHTAGS` or more keywords no LLM call is made and the list is
/// built from keywords alone.
pub async fn write_hashtags(
    post: &str,
    guide: &PostGuide,
    llm: &dyn CompletionService,
) -> Result<Vec<String>, AppError> {
    let number = generated_count(&guide.keywords);

    let generated = if number > 0 {
        let system = HASHTAG_SYSTEM_TEMPLATE
            .replace("{number}", &number.to_string())
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
            .replace("{closing}", CLOSING_INSTRUCTION);
        let request = CompletionRequest::new(
            PROFILE,
            system,
            fill_template(HASHTAG_PROMPT_TEMPLATE, &[("post", post)]),
        )
        .json();

        let response: HashtagResponse = complete_json(llm, &request)
            .await
            .map_err(|e| AppError::Llm(format!("Hashtag generation failed: {e}")))?;

        if response.hashtags.len() != number {
            warn!(
                "Requested {} hashtags, LLM returned {}",
                number,
                response.hashtags.len()
            );
        }
        response
            .hashtags
            .iter()
            .map(|h| to_hashtag(h))
            .take(number)
            .collect()
    } else {
        Vec::new()
    };

    let hashtags = merge_hashtags(generated, &guide.keywords);
    info!("Composed {} hashtags", hashtags.len());
    Ok(hashtags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::post::guide::sample_guide;

    fn generated_json(n: usize) -> String {
        let tags: Vec<String> = (0..n).map(|i| format!("#태그{i}")).collect();
        serde_json::json!({ "hashtags": tags }).to_string()
    }

    fn keywords(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("키워드{i}")).collect()
    }

    #[test]
    fn test_to_hashtag_strips_both_ends() {
        assert_eq!(to_hashtag("# 숯불 #"), "#숯불");
        assert_eq!(to_hashtag("맛집"), "#맛집");
        assert_eq!(to_hashtag("##직화"), "#직화");
    }

    #[test]
    fn test_generated_count_saturates() {
        assert_eq!(generated_count(&keywords(3)), 17);
        assert_eq!(generated_count(&keywords(20)), 0);
        assert_eq!(generated_count(&keywords(25)), 0);
    }

    #[test]
    fn test_merge_caps_keyword_hashtags() {
        let merged = merge_hashtags(vec![], &keywords(25));
        assert_eq!(merged.len(), MAX_HASHTAGS);
        assert_eq!(merged[0], "#키워드0");
        assert_eq!(merged[19], "#키워드19");
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let merged = merge_hashtags(vec!["#숯불".to_string()], &["숯불".to_string()]);
        assert_eq!(merged, vec!["#숯불", "#숯불"]);
    }

    #[tokio::test]
    async fn test_seventeen_generated_plus_three_keywords() {
        let llm = ScriptedLlm::new([generated_json(17)]);
        let guide = sample_guide();

        let hashtags = write_hashtags("본문", &guide, &llm).await.unwrap();
        assert_eq!(hashtags.len(), 20);
        for keyword in &guide.keywords {
            assert!(hashtags.contains(&format!("#{keyword}")));
        }
        assert!(llm.requests()[0].system.contains("exactly 17"));
    }

    #[tokio::test]
    async fn test_oversupplied_generation_never_crowds_out_keywords() {
        let llm = ScriptedLlm::new([generated_json(30)]);
        let guide = sample_guide();

        let hashtags = write_hashtags("본문", &guide, &llm).await.unwrap();
        assert_eq!(hashtags.len(), 20);
        assert_eq!(&hashtags[17..], &["#숯불", "#직화", "#맛집"]);
    }

    #[tokio::test]
    async fn test_generated_tags_are_normalized() {
        let llm = ScriptedLlm::new([r##"{"hashtags": ["서울맛집", "#소고기"]}"##]);
        let hashtags = write_hashtags("본문", &sample_guide(), &llm).await.unwrap();
        assert_eq!(&hashtags[..2], &["#서울맛집", "#소고기"]);
        assert_eq!(hashtags.len(), 5);
    }

    #[tokio::test]
    async fn test_no_call_when_keywords_fill_the_list() {
        let llm = ScriptedLlm::new(Vec::<String>::new());
        let mut guide = sample_guide();
        guide.keywords = keywords(20);

        let hashtags = write_hashtags("본문", &guide, &llm).await.unwrap();
        assert_eq!(hashtags.len(), 20);
        assert_eq!(llm.call_count(), 0);
    }
}
