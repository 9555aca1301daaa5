//! Phone recommendation adapter.
//!
//! Owns the single Gemini handle for the process. The handle is built once
//! at startup; when the credential is missing or the client cannot be built
//! the service stays disabled for the rest of the process lifetime.

use super::providers::gemini::{GeminiConfig, GeminiTextProvider};
use super::providers::{GenerationParams, ProviderError, TextProvider};
use crate::config::{GeminiSettings, API_KEY_VAR};
use std::sync::Arc;
use thiserror::Error;

/// Fixed instruction sent as the model's system prompt on every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional mobile phone recommendation expert.\n\
When generating the recommendation:\n\
1. ALWAYS mention the actual numeric values provided by the user \
(like ₹ price ranges, battery mAh, screen size, weight, RAM, etc.).\n\
2. NEVER replace numbers with vague terms like 'budget-friendly', 'mid-range', \
'entry-level', or 'premium'.\n\
3. Provide a clean, well-structured summary in 3-5 sentences.\n\
4. Recommend EXACTLY two real smartphone models that best match the criteria.\n\
5. Do NOT repeat the raw criteria text. Instead, interpret it meaningfully.\n\
6. If numeric conditions conflict, choose the closest matching models instead of refusing.\n";

pub const TEMPERATURE: f32 = 0.6;
pub const TOP_P: f32 = 0.9;
pub const MAX_OUTPUT_TOKENS: i32 = 250;

/// Failure of a recommendation call. `Display` is the user-facing text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("AI Service failed: Gemini client is not initialized (check API Key).")]
    NotInitialized,

    /// The provider rejected or failed the call.
    #[error("AI Service is currently unavailable due to an API error: {0}")]
    Api(String),

    /// Anything else: transport failures, unusable responses.
    #[error("AI Service failed due to a general error: {0}")]
    General(String),
}

impl From<ProviderError> for RecommendationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ApiError { .. } => RecommendationError::Api(err.to_string()),
            // Raised while building the client; providers do not return it from `generate`.
            ProviderError::NotConfigured(_) => RecommendationError::NotInitialized,
            ProviderError::NetworkError(_)
            | ProviderError::InvalidResponse(_)
            | ProviderError::ContentFiltered => RecommendationError::General(err.to_string()),
        }
    }
}

pub struct RecommendationService {
    provider: Option<Arc<dyn TextProvider>>,
}

impl RecommendationService {
    /// Service backed by an already-configured provider.
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Service that refuses every call without touching the network.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Build the Gemini-backed service from settings. Never fails: problems
    /// are logged and yield a disabled service.
    pub fn from_settings(settings: &GeminiSettings) -> Self {
        let Some(api_key) = settings.api_key.clone() else {
            tracing::error!(
                env_var = API_KEY_VAR,
                "Gemini API key is missing; summaries are disabled"
            );
            return Self::disabled();
        };

        let config = GeminiConfig {
            api_key,
            model: settings.model.clone(),
            api_base: settings.api_base.clone(),
            timeout: settings.request_timeout,
        };

        match GeminiTextProvider::new(config) {
            Ok(provider) => {
                tracing::info!(model = %settings.model, "Initialized Gemini text provider");
                Self::new(Arc::new(provider))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize Gemini client; summaries are disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.provider.is_some()
    }

    fn generation_params() -> GenerationParams {
        GenerationParams {
            temperature: Some(TEMPERATURE),
            top_p: Some(TOP_P),
            max_tokens: Some(MAX_OUTPUT_TOKENS),
        }
    }

    /// Produce a recommendation summary for `prompt`.
    ///
    /// Returns the trimmed model text. All failures are logged here and come
    /// back as [`RecommendationError`]; nothing panics.
    pub async fn produce_summary(&self, prompt: &str) -> Result<String, RecommendationError> {
        let Some(provider) = self.provider.as_ref() else {
            tracing::warn!("Summary requested while Gemini client is not initialized");
            return Err(RecommendationError::NotInitialized);
        };

        let result = provider
            .generate(Some(SYSTEM_INSTRUCTION), prompt, &Self::generation_params())
            .await
            .map_err(RecommendationError::from)
            .and_then(|response| {
                tracing::info!(
                    model = provider.model(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    finish_reason = ?response.finish_reason,
                    "Gemini generation completed"
                );
                response.text.ok_or_else(|| {
                    RecommendationError::General(
                        "Gemini response did not contain any text".to_string(),
                    )
                })
            });

        match result {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                match &e {
                    RecommendationError::Api(detail) => {
                        tracing::error!(model = provider.model(), error = %detail, "Gemini API error")
                    }
                    _ => tracing::error!(model = provider.model(), error = %e, "General error"),
                }
                Err(e)
            }
        }
    }
}
