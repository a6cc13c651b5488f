//! Review Generation — keyword extraction followed by the two review texts.

use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::review::guide::ReviewGuide;
use crate::review::keywords::extract_keywords;
use crate::review::writer::{write_product_review, Review};
use crate::revision::RevisionPolicy;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReview {
    pub request_id: Uuid,
    pub keywords: Vec<String>,
    pub review: Review,
}

pub async fn generate_review(
    guide: ReviewGuide,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<GeneratedReview, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("review_generation", %request_id);

    async move {
        guide.validate()?;

        let keywords = extract_keywords(&guide, llm, policy).await?;
        let guide = guide.with_keywords(keywords)?;

        let review = write_product_review(&guide, llm).await?;
        info!("Generated review for {:?}", guide.product);

        Ok(GeneratedReview {
            request_id,
            keywords: guide.keywords()?.to_vec(),
            review,
        })
    }
    .instrument(span)
    .await
}
