//! OpenAI implementation of the gift suggester.
//!
//! Sends one chat completion with a strict JSON schema response format and
//! parses the returned suggestion list.
//!
//! # Example
//!
//! ```rust,ignore
//! use secret_santa::ai::OpenAiSuggester;
//!
//! let suggester = OpenAiSuggester::new("sk-...").with_model("gpt-4o-mini");
//! let ideas = suggester.suggest("Bo", &wishlist, Language::En).await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{Result, SantaError};
use crate::traits::suggest::GiftSuggester;
use crate::types::suggestion::{GiftSuggestion, Language};

/// Number of ideas requested per call.
const SUGGESTION_COUNT: usize = 3;

#[derive(Clone)]
pub struct OpenAiSuggester {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiSuggester {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| SantaError::Suggestion("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Prompt asking for ideas for one recipient.
pub fn suggestion_prompt(recipient_name: &str, wishlist: &[String], lang: Language) -> String {
    let wishlist_text = if wishlist.is_empty() {
        "No specific wishes listed, surprise them based on general popularity.".to_string()
    } else {
        wishlist.join(", ")
    };

    format!(
        "I am participating in a Secret Santa.\n\
         My recipient is named {recipient_name}.\n\
         Their wishlist contains: {wishlist_text}.\n\n\
         Please suggest {SUGGESTION_COUNT} creative, thoughtful, and appropriate gift ideas.\n\
         If the wishlist is empty, suggest generally popular but unique items.\n\
         If the wishlist exists, suggest specific items that match the vibe \
         or are direct variations/upgrades.\n\n\
         {}",
        lang.instruction()
    )
}

fn suggestion_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "item": { "type": "string", "description": "Name of the gift item" },
                        "reason": { "type": "string", "description": "Why this is a good match" },
                        "estimatedPrice": {
                            "type": "string",
                            "description": "Estimated price range (e.g. $20-$30 or NT$500-1000)"
                        }
                    },
                    "required": ["item", "reason", "estimatedPrice"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["suggestions"],
        "additionalProperties": false
    })
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct SuggestionList {
    suggestions: Vec<GiftSuggestion>,
}

/// Parse the model's JSON content into suggestions.
pub fn parse_suggestions(content: &str) -> Result<Vec<GiftSuggestion>> {
    serde_json::from_str::<SuggestionList>(content)
        .map(|list| list.suggestions)
        .map_err(|e| SantaError::Suggestion(format!("Failed to parse suggestions: {e}")))
}

#[async_trait]
impl GiftSuggester for OpenAiSuggester {
    async fn suggest(
        &self,
        recipient_name: &str,
        wishlist: &[String],
        lang: Language,
    ) -> Result<Vec<GiftSuggestion>> {
        let prompt = suggestion_prompt(recipient_name, wishlist, lang);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "gift_suggestions",
                    "strict": true,
                    "schema": suggestion_schema(),
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Suggestion request failed");
                SantaError::Suggestion(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Suggestion API error");
            return Err(SantaError::Suggestion(format!("API error ({status}): {error_text}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| SantaError::Suggestion(e.to_string()))?;

        let Some(content) = chat.choices.into_iter().next().and_then(|c| c.message.content) else {
            return Ok(Vec::new());
        };

        let suggestions = parse_suggestions(&content)?;
        debug!(count = suggestions.len(), model = %self.model, "Received gift suggestions");
        Ok(suggestions)
    }
}
