use crate::dtos::{GenerateSummaryRequest, SummaryResponse};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

pub const NO_PROMPT_MESSAGE: &str = "No prompt provided";

pub async fn generate_summary(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = match payload {
        Ok(Json(body)) => GenerateSummaryRequest::from_json(&body).into_prompt(),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Rejected summary request body");
            None
        }
    }
    .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(NO_PROMPT_MESSAGE)))?;

    let (status, summary) = match state.recommendations.produce_summary(&prompt).await {
        Ok(summary) => (StatusCode::OK, summary),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    Ok((status, Json(SummaryResponse { summary })))
}

#[cfg(test)]
mod tests {
    use crate::config::{GeminiSettings, SummaryConfig};
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::ProviderError;
    use crate::services::RecommendationService;
    use crate::startup::{router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(recommendations: RecommendationService) -> AppState {
        AppState {
            config: SummaryConfig {
                common: service_core::config::Config {
                    host: "127.0.0.1".to_string(),
                    port: 0,
                },
                gemini: GeminiSettings::default(),
            },
            recommendations: Arc::new(recommendations),
        }
    }

    async fn post_raw(state: AppState, content_type: &str, body: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/generate_summary")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(state: AppState, body: Value) -> (StatusCode, Value) {
        post_raw(state, "application/json", &body.to_string()).await
    }

    #[tokio::test]
    async fn missing_or_blank_prompt_is_bad_request_without_provider_call() {
        let mock = Arc::new(MockTextProvider::replying("unused"));

        for body in [json!({}), json!({ "prompt": "" }), json!({ "prompt": "   " })] {
            let state = state_with(RecommendationService::new(mock.clone()));
            let (status, response) = post_json(state, body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": "No prompt provided" }));
        }

        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_bad_request() {
        let state = state_with(RecommendationService::disabled());
        let (status, response) = post_raw(state, "application/json", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "No prompt provided" }));

        let state = state_with(RecommendationService::disabled());
        let (status, _) = post_raw(state, "text/plain", r#"{"prompt":"test"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_object_body_is_bad_request_without_provider_call() {
        let mock = Arc::new(MockTextProvider::replying("Pick A and B."));

        for body in [json!(["under 20000"]), json!("under 20000"), json!({ "prompt": 42 })] {
            let state = state_with(RecommendationService::new(mock.clone()));
            let (status, response) = post_json(state, body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": "No prompt provided" }));
        }

        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn disabled_adapter_is_internal_error_with_fixed_text() {
        let state = state_with(RecommendationService::disabled());

        let (status, response) = post_json(state, json!({ "prompt": "test" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response,
            json!({ "summary": "AI Service failed: Gemini client is not initialized (check API Key)." })
        );
    }

    #[tokio::test]
    async fn successful_generation_is_ok_with_summary() {
        let mock = Arc::new(MockTextProvider::replying("  Consider the Moto G64 and iQOO Z9.  "));
        let state = state_with(RecommendationService::new(mock.clone()));

        let (status, response) =
            post_json(state, json!({ "prompt": "under ₹20000, battery 5000mAh" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response,
            json!({ "summary": "Consider the Moto G64 and iQOO Z9." })
        );
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn provider_errors_are_internal_errors() {
        let api = Arc::new(MockTextProvider::failing(ProviderError::ApiError {
            status: 403,
            message: "Permission denied".to_string(),
        }));
        let (status, response) =
            post_json(state_with(RecommendationService::new(api)), json!({ "prompt": "test" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response["summary"]
            .as_str()
            .unwrap()
            .starts_with("AI Service is currently unavailable due to an API error:"));

        let general = Arc::new(MockTextProvider::failing(ProviderError::InvalidResponse(
            "truncated body".to_string(),
        )));
        let (status, response) = post_json(
            state_with(RecommendationService::new(general)),
            json!({ "prompt": "test" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response["summary"]
            .as_str()
            .unwrap()
            .starts_with("AI Service failed due to a general error:"));
    }

    #[tokio::test]
    async fn summary_resembling_failure_text_is_still_ok() {
        let mock = Arc::new(MockTextProvider::replying(
            "AI Service failed to find a phone under ₹5000, so here are the closest two.",
        ));
        let state = state_with(RecommendationService::new(mock));

        let (status, _) = post_json(state, json!({ "prompt": "under ₹5000" })).await;

        assert_eq!(status, StatusCode::OK);
    }
}
