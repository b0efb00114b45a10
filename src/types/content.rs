//! Request and response bodies for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::types::{GenerationConfig, Role, Turn};

/// A text fragment of a [`Content`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// The text of this part.  Non-text parts deserialize with `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The author.  Responses may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// The parts making up the message.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Self {
            role: Some(turn.role()),
            parts: vec![Part::text(turn.text())],
        }
    }
}

/// Sampling parameters as the API spells them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling value.
    pub top_p: f32,
    /// Cap on generated tokens.
    pub max_output_tokens: u32,
}

impl From<&GenerationConfig> for WireGenerationConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature(),
            top_p: config.top_p(),
            max_output_tokens: config.max_output_tokens(),
        }
    }
}

/// Body of a `generateContent` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The whole conversation, oldest first.
    pub contents: Vec<Content>,

    /// Sampling parameters.
    pub generation_config: WireGenerationConfig,
}

impl GenerateContentRequest {
    /// Builds a request carrying every turn and the session config.
    pub fn new(turns: &[Turn], config: &GenerationConfig) -> Self {
        Self {
            contents: turns.iter().map(Content::from).collect(),
            generation_config: WireGenerationConfig::from(config),
        }
    }
}

/// One generated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated message.  Absent when generation stopped early.
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped, e.g. `STOP` or `MAX_TOKENS`.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// Concatenates the text parts of this candidate.
    ///
    /// Returns `None` when the candidate carries no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.content.as_ref()?;
        let mut texts = content.parts.iter().filter_map(|p| p.text.as_deref()).peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Token accounting for a request.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt, including history.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Prompt plus candidates.
    #[serde(default)]
    pub total_token_count: u64,
}

/// Body of a successful `generateContent` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.  Empty when the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Feedback about the prompt.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting.
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let turns = vec![Turn::user("Hi"), Turn::model("Hello!"), Turn::user("Bye")];
        let request = GenerateContentRequest::new(&turns, &GenerationConfig::default());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Hi"}]},
                    {"role": "model", "parts": [{"text": "Hello!"}]},
                    {"role": "user", "parts": [{"text": "Bye"}]},
                ],
                "generationConfig": {
                    "temperature": 0.7f32,
                    "topP": 0.95f32,
                    "maxOutputTokens": 1024,
                }
            })
        );
    }

    #[test]
    fn response_text_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Fr"}, {"text": "ance"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 9, "candidatesTokenCount": 2, "totalTokenCount": 11}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.candidates[0].text().as_deref(), Some("France"));
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 11);
    }

    #[test]
    fn candidate_without_text() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(response.candidates[0].text().is_none());

        let body = r#"{"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(response.candidates[0].text().is_none());
    }

    #[test]
    fn blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
