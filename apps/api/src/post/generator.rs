//! Post Generation — orchestrates the full post pipeline.
//!
//! Flow: resolve restaurant → plan → write sections → review draft →
//!       revise into the final post → compose hashtags.

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::post::guide::PostGuide;
use crate::post::hashtags::write_hashtags;
use crate::post::metrics::{text_stats, uncovered_windows, TextStats, KEYWORD_WINDOW};
use crate::post::planner::{plan_writing_post, WritingPlan};
use crate::post::restaurant::find_restaurant;
use crate::post::reviewer::{review_draft, Feedback};
use crate::post::revisor::revise_draft;
use crate::post::writer::{write_draft, Draft};
use crate::revision::RevisionPolicy;

/// Everything produced for one post request.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub request_id: Uuid,
    pub title: String,
    pub restaurant: String,
    pub post: String,
    pub hashtags: Vec<String>,
    pub stats: TextStats,
    pub plan: WritingPlan,
    pub draft: Draft,
    pub feedback: Feedback,
}

/// Runs the post pipeline for an unresolved guide.
///
/// `restaurant_override` skips the resolver when the user named the restaurant.
pub async fn generate_post(
    guide: PostGuide,
    restaurant_override: Option<String>,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<GeneratedPost, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("post_generation", %request_id);

    async move {
        // Step 1: Resolve restaurant
        let restaurant = match restaurant_override.filter(|r| !r.trim().is_empty()) {
            Some(restaurant) => restaurant,
            None => find_restaurant(&guide.title, llm).await?,
        };
        let guide = guide.with_restaurant(&restaurant)?;
        let restaurant = guide.restaurant()?.to_string();

        // Step 2: Plan
        let plan = plan_writing_post(&guide, llm, policy).await?;

        // Step 3: Draft, section by section
        let draft = write_draft(&guide, &plan, llm, policy).await?;

        // Step 4: Review
        let feedback = review_draft(&guide, &draft, llm).await?;

        // Step 5: Revise
        let post = revise_draft(&guide, &draft, &feedback, llm, policy).await?;

        let uncovered = uncovered_windows(&post, &guide.keywords, KEYWORD_WINDOW);
        if !uncovered.is_empty() {
            warn!(
                "{} of the post's {}-character windows contain no keyword",
                uncovered.len(),
                KEYWORD_WINDOW
            );
        }

        // Step 6: Hashtags
        let hashtags = write_hashtags(&post, &guide, llm).await?;

        let stats = text_stats(&post);
        info!(
            "Generated post for {:?}: {} letters, {} words, {} hashtags",
            restaurant,
            stats.letters,
            stats.words,
            hashtags.len()
        );

        Ok(GeneratedPost {
            request_id,
            title: guide.title.clone(),
            restaurant,
            post,
            hashtags,
            stats,
            plan,
            draft,
            feedback,
        })
    }
    .instrument(span)
    .await
}
