//! Draft Revisor — merges draft and feedback into the finished post.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, CLOSING_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService, ModelProfile};
use crate::post::guide::PostGuide;
use crate::post::prompts::{
    greeting, guidelines, GREETING_MISSING_TEMPLATE, POST_TOO_SHORT_TEMPLATE,
    REVISE_PROMPT_TEMPLATE, REVISE_SYSTEM_TEMPLATE,
};
use crate::post::reviewer::Feedback;
use crate::post::writer::Draft;
use crate::revision::{char_count, revise_text, RevisionPolicy, Verdict};

const PROFILE: ModelProfile = ModelProfile::standard(4000);

/// The finished post must reach `max_length` characters and open with the greeting.
pub fn check_post(post: &str, guide: &PostGuide, restaurant: &str) -> Verdict {
    let actual = char_count(post.trim());
    if actual < guide.max_length as usize {
        return Err(POST_TOO_SHORT_TEMPLATE
            .replace("{actual}", &actual.to_string())
            .replace("{max_length}", &guide.max_length.to_string()));
    }
    let greeting = greeting(restaurant);
    if !post.trim_start().starts_with(&greeting) {
        return Err(fill_template(GREETING_MISSING_TEMPLATE, &[("greeting", &greeting)]));
    }
    Ok(())
}

pub async fn revise_draft(
    guide: &PostGuide,
    draft: &Draft,
    feedback: &Feedback,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<String, AppError> {
    let restaurant = guide.restaurant()?;

    let system = fill_template(
        REVISE_SYSTEM_TEMPLATE,
        &[
            ("guidelines", &guidelines(restaurant)),
            ("max_length", &guide.max_length.to_string()),
            ("closing", CLOSING_INSTRUCTION),
        ],
    );

    let to_json = |value: serde_json::Result<String>, what: &str| {
        value.map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
    };
    let prompt = fill_template(
        REVISE_PROMPT_TEMPLATE,
        &[
            ("post_guide", &to_json(serde_json::to_string_pretty(guide), "PostGuide")?),
            ("draft", &to_json(serde_json::to_string_pretty(draft), "Draft")?),
            ("feedback", &to_json(serde_json::to_string_pretty(feedback), "Feedback")?),
        ],
    );

    let request = CompletionRequest::new(PROFILE, system, prompt);

    let post = revise_text(llm, request, policy, "post revision", |reply| {
        check_post(reply, guide, restaurant)
    })
    .await?;

    let post = post.trim().to_string();
    info!("Post revised: {} characters", char_count(&post));
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::post::guide::sample_guide;
    use crate::post::reviewer::feedback_json;
    use crate::post::writer::sample_draft;

    fn resolved() -> PostGuide {
        sample_guide().with_restaurant("소고기 천국").unwrap()
    }

    fn long_post(chars: usize) -> String {
        let greeting = greeting("소고기 천국");
        let filler = "숯".repeat(chars.saturating_sub(char_count(&greeting)));
        format!("{greeting}{filler}")
    }

    #[test]
    fn test_check_post_requires_max_length() {
        let guide = resolved();
        assert!(check_post(&long_post(1500), &guide, "소고기 천국").is_ok());
        let correction = check_post(&long_post(1499), &guide, "소고기 천국").unwrap_err();
        assert!(correction.contains("1499"));
    }

    #[test]
    fn test_check_post_requires_greeting() {
        let guide = resolved();
        let post = "숯".repeat(1600);
        assert!(check_post(&post, &guide, "소고기 천국")
            .unwrap_err()
            .contains("does not start with"));
    }

    #[tokio::test]
    async fn test_revise_draft_retries_short_post() {
        let llm = ScriptedLlm::new([long_post(800), long_post(1600)]);
        let feedback: Feedback = serde_json::from_str(&feedback_json()).unwrap();

        let post = revise_draft(&resolved(), &sample_draft(), &feedback, &llm, RevisionPolicy::default())
            .await
            .unwrap();
        assert_eq!(char_count(&post), 1600);
        assert_eq!(llm.call_count(), 2);

        let first = &llm.requests()[0];
        assert!(first.user.contains("\"advice\""));
        assert!(first.user.contains("\"paragraph\""));
        assert!(first.user.contains("\"max_length\": 1500"));
    }
}
