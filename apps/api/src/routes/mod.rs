pub mod frontend;
pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth;
use crate::post::handlers as post_handlers;
use crate::review::handlers as review_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Generation API, gated by the shared secret
    let gated = Router::new()
        .route("/api/v1/posts", post(post_handlers::handle_generate_post))
        .route(
            "/api/v1/posts/restaurant",
            post(post_handlers::handle_find_restaurant),
        )
        .route("/api/v1/reviews", post(review_handlers::handle_generate_review))
        .route(
            "/api/v1/reviews/keywords",
            post(review_handlers::handle_extract_keywords),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_secret,
        ));

    Router::new()
        .route("/", get(frontend::index))
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth", post(auth::handle_auth))
        .merge(gated)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::SECRET_HEADER;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::revision::RevisionPolicy;

    const SECRET: &str = "TEST_SECRET";

    fn app(llm: Arc<ScriptedLlm>) -> Router {
        build_router(AppState {
            llm,
            secret: Arc::new(SECRET.to_string()),
            revision: RevisionPolicy::default(),
        })
    }

    fn post_json(uri: &str, secret: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn review_request() -> Value {
        json!({
            "category": "전자제품",
            "product": "앱코 K517 레트로 기계식 (적축)",
            "score": 4,
            "max_length": 1000,
            "positive_review": "기계식 키보드 입문용으로 좋습니다",
            "negative_review": "유선키보드라 조금 불편합니다",
            "sponsored": false,
            "purchased_date": "2025-01-25",
            "arrived_date": "2025-02-01",
            "packaging_state": "good"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(ScriptedLlm::default()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "blog-agent");
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let response = app(Arc::new(ScriptedLlm::default()))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_auth_endpoint() {
        let app = app(Arc::new(ScriptedLlm::default()));

        let ok = app
            .clone()
            .oneshot(post_json("/api/v1/auth", None, json!({ "secret": SECRET })))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);

        let wrong = app
            .clone()
            .oneshot(post_json("/api/v1/auth", None, json!({ "secret": "nope" })))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let typed = app
            .oneshot(post_json("/api/v1/auth", None, json!({ "secret": 1234 })))
            .await
            .unwrap();
        assert_eq!(typed.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_gated_routes_reject_missing_secret() {
        let llm = Arc::new(ScriptedLlm::new([r#"{"restaurant": "소고기 천국"}"#]));
        let response = app(llm.clone())
            .oneshot(post_json(
                "/api/v1/posts/restaurant",
                None,
                json!({ "title": "서울의 \"소고기 천국\" 다녀왔어요!" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_find_restaurant_route() {
        let llm = Arc::new(ScriptedLlm::new([r#"{"restaurant": "소고기 천국"}"#]));
        let response = app(llm.clone())
            .oneshot(post_json(
                "/api/v1/posts/restaurant",
                Some(SECRET),
                json!({ "title": "서울의 \"소고기 천국\" 다녀왔어요!" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["restaurant"], "소고기 천국");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_post_validation_error_is_400() {
        let llm = Arc::new(ScriptedLlm::default());
        let response = app(llm.clone())
            .oneshot(post_json(
                "/api/v1/posts",
                Some(SECRET),
                json!({
                    "title": "제목",
                    "review": "리뷰",
                    "max_length": 100,
                    "keywords": "숯불",
                    "foods": "소고기"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_keywords_route() {
        let llm = Arc::new(ScriptedLlm::new([r#"{"keywords": ["내돈내산", "입문용"]}"#]));
        let response = app(llm)
            .oneshot(post_json("/api/v1/reviews/keywords", Some(SECRET), review_request()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["keywords"], json!(["내돈내산", "입문용"]));
    }

    #[tokio::test]
    async fn test_generate_review_route_renders_markdown() {
        let llm = Arc::new(ScriptedLlm::new([
            r#"{"keywords": ["내돈내산", "타건감"]}"#.to_string(),
            "잘 받았어요!".to_string(),
            crate::review::writer::product_review_json(),
        ]));
        let response = app(llm)
            .oneshot(post_json("/api/v1/reviews", Some(SECRET), review_request()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["keywords"], json!(["내돈내산", "타건감"]));
        let markdown = body["markdown"].as_str().unwrap();
        assert!(markdown.starts_with("> Seller Review"));
        assert!(markdown.contains("# 내돈내산 기계식 키보드 입문기"));
    }

    #[tokio::test]
    async fn test_exhausted_revision_is_502() {
        let llm = Arc::new(ScriptedLlm::new([r#"{"keywords": ["타건감"]}"#]));
        let state = AppState {
            llm: llm.clone(),
            secret: Arc::new(SECRET.to_string()),
            revision: RevisionPolicy::new(1),
        };
        let response = build_router(state)
            .oneshot(post_json("/api/v1/reviews/keywords", Some(SECRET), review_request()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"]["code"], "CONSTRAINT_UNSATISFIED");
        assert_eq!(llm.call_count(), 1);
    }
}
