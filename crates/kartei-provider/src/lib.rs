use serde::{Deserialize, Serialize};

pub type LanguageCode = String;

/// Vocabulary lookup interface (translation + example sentence)
#[async_trait::async_trait]
pub trait VocabProvider: Send + Sync {
    /// Look up `term`, optionally steered by free-text `context` (empty for none)
    async fn get_vocab(&self, term: &str, context: &str) -> Result<VocabItem, ProviderError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// Speech synthesis interface
#[async_trait::async_trait]
pub trait AudioProvider: Send + Sync {
    /// Synthesize `text` into a raw audio payload (MP3)
    async fn get_audio(&self, text: &str) -> Result<Vec<u8>, ProviderError>;

    /// Media filename for a card identity token. Must be pure: no I/O.
    fn get_file_name(&self, identity_token: &str) -> String;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// Result of a vocabulary lookup. Missing keys decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabItem {
    pub term: String,
    pub term_translation: String,
    pub sentence: String,
    pub sentence_translation: String,
}

impl VocabItem {
    pub fn new(
        term: impl Into<String>,
        term_translation: impl Into<String>,
        sentence: impl Into<String>,
        sentence_translation: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            term_translation: term_translation.into(),
            sentence: sentence.into(),
            sentence_translation: sentence_translation.into(),
        }
    }

    /// Decode a backend JSON object. An absent or blank `term` falls back to
    /// the term that was asked for.
    pub fn from_json(content: &str, requested_term: &str) -> Result<Self, ProviderError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {e}")))?;

        if !value.is_object() {
            return Err(ProviderError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        }

        let mut item: VocabItem = serde_json::from_value(value)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if item.term.trim().is_empty() {
            item.term = requested_term.to_string();
        }

        Ok(item)
    }
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty response from backend")]
    EmptyResponse,

    #[error("Text rejected: {0}")]
    TextRejected(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
