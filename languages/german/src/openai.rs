use async_trait::async_trait;
use kartei_provider::{ProviderError, ProviderMetadata, VocabItem, VocabProvider};
use serde::{Deserialize, Serialize};

use crate::prompts::{VocabPrompts, substitute};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Vocabulary lookup through an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct OpenAiVocabProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    target_language: String,
    prompts: VocabPrompts,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiVocabProvider {
    pub fn new(api_key: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            target_language: target_language.into(),
            prompts: VocabPrompts::embedded(),
        }
    }

    /// Share a client, e.g. one built with a request timeout
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_prompts(mut self, prompts: VocabPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// System, exemplar and user messages for one lookup
    pub fn messages(&self, term: &str, context: &str) -> Vec<ChatMessage> {
        let vars = [
            ("term", term),
            ("context", context),
            ("target_language", self.target_language.as_str()),
        ];

        vec![
            ChatMessage::new("system", substitute(&self.prompts.system, &vars)),
            ChatMessage::new("assistant", self.prompts.assistant.clone()),
            ChatMessage::new("user", substitute(&self.prompts.user, &vars)),
        ]
    }
}

#[async_trait]
impl VocabProvider for OpenAiVocabProvider {
    async fn get_vocab(&self, term: &str, context: &str) -> Result<VocabItem, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError);
        }

        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: self.messages(term, context),
        };

        tracing::debug!("Requesting vocab for {:?} from {}", term, self.model);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationError);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!("HTTP {}: {}", status, body.trim())));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        VocabItem::from_json(strip_code_fence(&content), term)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenAI".to_string(),
            requires_api_key: true,
            free_tier_available: false,
        }
    }
}

/// Chat models sometimes wrap JSON in a markdown fence
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. `json`) on the opening line
    let inner = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    inner.strip_suffix("```").unwrap_or(inner).trim()
}
