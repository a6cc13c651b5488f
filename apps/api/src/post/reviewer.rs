//! Draft Reviewer — scores each draft section against the writing guidelines.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, CLOSING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService, ModelProfile};
use crate::post::guide::PostGuide;
use crate::post::prompts::{guidelines, REVIEW_PROMPT_TEMPLATE, REVIEW_SYSTEM_TEMPLATE};
use crate::post::writer::Draft;

const PROFILE: ModelProfile = ModelProfile::standard(1500);
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    /// 0 (worst) to 10 (best).
    pub score: u8,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub introduction: SectionFeedback,
    pub bodies: Vec<SectionFeedback>,
    pub conclusion: SectionFeedback,
    pub overall: SectionFeedback,
}

impl Feedback {
    fn entries(&self) -> impl Iterator<Item = &SectionFeedback> {
        std::iter::once(&self.introduction)
            .chain(self.bodies.iter())
            .chain([&self.conclusion, &self.overall])
    }
}

/// Reviews a completed draft. A single call; the feedback is trusted as-is.
pub async fn review_draft(
    guide: &PostGuide,
    draft: &Draft,
    llm: &dyn CompletionService,
) -> Result<Feedback, AppError> {
    let restaurant = guide.restaurant()?;

    let system = fill_template(
        REVIEW_SYSTEM_TEMPLATE,
        &[
            ("guidelines", &guidelines(restaurant)),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("closing", CLOSING_INSTRUCTION),
        ],
    );

    let draft_json = serde_json::to_string_pretty(draft)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize Draft: {e}")))?;

    let request = CompletionRequest::new(
        PROFILE,
        system,
        fill_template(REVIEW_PROMPT_TEMPLATE, &[("draft", &draft_json)]),
    )
    .json();

    let feedback: Feedback = complete_json(llm, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Draft review failed: {e}")))?;

    if feedback.bodies.len() != draft.bodies.len() {
        warn!(
            "Feedback covers {} bodies but the draft has {}",
            feedback.bodies.len(),
            draft.bodies.len()
        );
    }
    if feedback.entries().any(|f| f.score > MAX_SCORE) {
        warn!("Feedback contains scores above {MAX_SCORE}");
    }

    info!("Draft reviewed: overall score {}/{MAX_SCORE}", feedback.overall.score);
    Ok(feedback)
}

#[cfg(test)]
pub(crate) fn feedback_json() -> String {
    serde_json::json!({
        "introduction": {"score": 8, "advice": "인사 뒤에 분위기를 더 설명하세요."},
        "bodies": [{"score": 6, "advice": "\"정말\"을 지우세요."}],
        "conclusion": {"score": 7, "advice": "방문 정보를 덧붙이세요."},
        "overall": {"score": 7, "advice": "전체 길이를 늘리세요."},
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::llm_client::ResponseFormat;
    use crate::post::guide::sample_guide;
    use crate::post::writer::sample_draft;

    #[tokio::test]
    async fn test_review_draft_sends_draft_json() {
        let llm = ScriptedLlm::new([feedback_json()]);
        let guide = sample_guide().with_restaurant("소고기 천국").unwrap();

        let feedback = review_draft(&guide, &sample_draft(), &llm).await.unwrap();
        assert_eq!(feedback.bodies.len(), 1);
        assert_eq!(feedback.overall.score, 7);

        let request = &llm.requests()[0];
        assert_eq!(request.format, ResponseFormat::Json);
        assert!(request.user.contains("\"paragraph\""));
        assert!(request.user.contains("\"target_length\""));
    }

    #[tokio::test]
    async fn test_feedback_missing_overall_fails() {
        let llm = ScriptedLlm::new([r#"{"introduction": {"score": 1, "advice": "a"}, "bodies": [], "conclusion": {"score": 1, "advice": "b"}}"#]);
        let guide = sample_guide().with_restaurant("소고기 천국").unwrap();
        let err = review_draft(&guide, &sample_draft(), &llm).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[test]
    fn test_feedback_entries_cover_every_section() {
        let feedback: Feedback = serde_json::from_str(&feedback_json()).unwrap();
        assert_eq!(feedback.entries().count(), 4);
    }
}
