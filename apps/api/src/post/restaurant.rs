//! Restaurant Resolver — extracts the restaurant name from a post title.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{complete_json, CompletionRequest, CompletionService, ModelProfile};
use crate::post::prompts::{RESTAURANT_PROMPT_TEMPLATE, RESTAURANT_SYSTEM};

const PROFILE: ModelProfile = ModelProfile::mini(100);

#[derive(Debug, Deserialize)]
struct RestaurantResponse {
    restaurant: String,
}

/// Asks the LLM for the restaurant named in `title`.
///
/// A blank answer is an `EmptyExtraction` error rather than text that would
/// be embedded into the post.
pub async fn find_restaurant(title: &str, llm: &dyn CompletionService) -> Result<String, AppError> {
    let request = CompletionRequest::new(
        PROFILE,
        RESTAURANT_SYSTEM,
        fill_template(RESTAURANT_PROMPT_TEMPLATE, &[("title", title)]),
    )
    .json();

    let response: RestaurantResponse = complete_json(llm, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Restaurant resolution failed: {e}")))?;

    let restaurant = response.restaurant.trim();
    if restaurant.is_empty() {
        return Err(AppError::EmptyExtraction("restaurant".to_string()));
    }

    info!("Resolved restaurant {:?} from title", restaurant);
    Ok(restaurant.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::llm_client::{ResponseFormat, MINI_MODEL};

    #[tokio::test]
    async fn test_find_restaurant_extracts_name() {
        let llm = ScriptedLlm::new([r#"{"restaurant": " 소고기 천국 "}"#]);
        let restaurant = find_restaurant("서울의 \"소고기 천국\" 다녀왔어요!", &llm)
            .await
            .unwrap();
        assert_eq!(restaurant, "소고기 천국");

        let request = &llm.requests()[0];
        assert_eq!(request.format, ResponseFormat::Json);
        assert_eq!(request.profile.model, MINI_MODEL);
        assert!(request.user.contains("소고기 천국"));
    }

    #[tokio::test]
    async fn test_blank_restaurant_is_empty_extraction() {
        let llm = ScriptedLlm::new([r#"{"restaurant": ""}"#]);
        let err = find_restaurant("그냥 다녀왔어요", &llm).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyExtraction(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_fails_loudly() {
        let llm = ScriptedLlm::new([r#"{"name": "소고기 천국"}"#]);
        let err = find_restaurant("title", &llm).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
