//! Writing Planner — asks the LLM for a section-by-section plan whose total
//! length lands within ±100 characters of the guide's `max_length`.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, CLOSING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService, ModelProfile};
use crate::post::guide::PostGuide;
use crate::post::prompts::{
    guidelines, PLAN_NO_BODIES, PLAN_OUT_OF_BAND_TEMPLATE, PLAN_PROMPT_TEMPLATE,
    PLAN_SYSTEM_TEMPLATE,
};
use crate::revision::{revise_json, RevisionPolicy, Verdict};

const PROFILE: ModelProfile = ModelProfile::standard(500);

/// One planned section: what it covers and how long it should be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingPlanDetail {
    pub subject: String,
    /// Minimum length in characters.
    pub target_length: u32,
}

/// Structural blueprint of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingPlan {
    pub introduction: WritingPlanDetail,
    pub bodies: Vec<WritingPlanDetail>,
    pub conclusion: WritingPlanDetail,
}

impl WritingPlan {
    /// Sum of every target length. Widened to `u64` so oversized LLM values
    /// cannot wrap back into the band.
    pub fn total_length(&self) -> u64 {
        std::iter::once(&self.introduction)
            .chain(self.bodies.iter())
            .chain(std::iter::once(&self.conclusion))
            .map(|detail| u64::from(detail.target_length))
            .sum()
    }

    /// Checks the plan against the guide's length band.
    pub fn check(&self, guide: &PostGuide) -> Verdict {
        if self.bodies.is_empty() {
            return Err(PLAN_NO_BODIES.to_string());
        }
        let band = guide.length_band();
        let total = self.total_length();
        if (u64::from(*band.start())..=u64::from(*band.end())).contains(&total) {
            Ok(())
        } else {
            Err(PLAN_OUT_OF_BAND_TEMPLATE
                .replace("{total}", &total.to_string())
                .replace("{min_length}", &band.start().to_string())
                .replace("{max_length}", &band.end().to_string()))
        }
    }
}

/// Plans the post. Plans outside the length band are sent back with a
/// correction until one fits or the policy's attempts run out.
pub async fn plan_writing_post(
    guide: &PostGuide,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<WritingPlan, AppError> {
    let restaurant = guide.restaurant()?;
    let band = guide.length_band();

    let system = fill_template(
        PLAN_SYSTEM_TEMPLATE,
        &[
            ("guidelines", &guidelines(restaurant)),
            ("min_length", &band.start().to_string()),
            ("max_length", &band.end().to_string()),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("closing", CLOSING_INSTRUCTION),
        ],
    );

    // The restaurant and length live in the system prompt already.
    let guide_json = serde_json::to_string_pretty(&json!({
        "title": guide.title,
        "review": guide.review,
        "keywords": guide.keywords,
        "foods": guide.foods,
    }))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize PostGuide: {e}")))?;

    let request = CompletionRequest::new(
        PROFILE,
        system,
        fill_template(PLAN_PROMPT_TEMPLATE, &[("post_guide", &guide_json)]),
    )
    .json();

    let plan: WritingPlan =
        revise_json(llm, request, policy, "writing plan", |plan: &WritingPlan| plan.check(guide)).await?;

    info!(
        "Writing plan ready: {} bodies, total target {} characters",
        plan.bodies.len(),
        plan.total_length()
    );
    Ok(plan)
}

#[cfg(test)]
pub(crate) fn plan_json(intro: u32, bodies: &[u32], conclusion: u32) -> String {
    serde_json::json!({
        "introduction": {"subject": "가게 소개", "target_length": intro},
        "bodies": bodies
            .iter()
            .enumerate()
            .map(|(i, len)| serde_json::json!({"subject": format!("본문 {i}"), "target_length": len}))
            .collect::<Vec<_>>(),
        "conclusion": {"subject": "방문 마무리", "target_length": conclusion},
    })
    .to_string()
}
