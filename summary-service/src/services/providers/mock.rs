//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock text provider that answers every call with a canned outcome.
pub struct MockTextProvider {
    outcome: Result<Option<String>, ProviderError>,
    calls: AtomicUsize,
    last_call: Mutex<Option<RecordedCall>>,
}

/// What the mock was last asked to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system_instruction: Option<String>,
    pub prompt: String,
    pub params: GenerationParams,
}

impl MockTextProvider {
    /// Reply with `text` on every call.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(Some(text.into())))
    }

    /// Reply successfully but with no text parts.
    pub fn empty() -> Self {
        Self::with_outcome(Ok(None))
    }

    /// Fail every call with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<Option<String>, ProviderError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call
            .lock()
            .map(|call| call.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        system_instruction: Option<&str>,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some(RecordedCall {
                system_instruction: system_instruction.map(str::to_string),
                prompt: prompt.to_string(),
                params: params.clone(),
            });
        }

        let text = self.outcome.clone()?;

        Ok(ProviderResponse {
            output_tokens: text.as_ref().map(|t| t.len() as i32 / 4).unwrap_or(0),
            text,
            input_tokens: prompt.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}
