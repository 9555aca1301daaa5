use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /generate_summary`. Only a JSON object carries a prompt.
#[derive(Debug, PartialEq, Eq)]
pub struct GenerateSummaryRequest {
    pub prompt: Option<String>,
}

impl GenerateSummaryRequest {
    /// Read the request out of an already-parsed body. Arrays, scalars and
    /// non-string `prompt` values yield no prompt.
    pub fn from_json(body: &Value) -> Self {
        Self {
            prompt: body
                .as_object()
                .and_then(|o| o.get("prompt"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// The prompt, if present and not blank.
    pub fn into_prompt(self) -> Option<String> {
        self.prompt.filter(|p| !p.trim().is_empty())
    }
}

/// Shared by success and failure: both report through `summary`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: String,
}
