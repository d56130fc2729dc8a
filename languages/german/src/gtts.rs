use async_trait::async_trait;
use kartei_provider::{AudioProvider, LanguageCode, ProviderError, ProviderMetadata};

const DEFAULT_API_URL: &str = "https://translate.google.com/translate_tts";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Longest chunk the endpoint accepts, in characters
pub const MAX_CHUNK_CHARS: usize = 100;

/// Speech synthesis through the Google Translate TTS endpoint
#[derive(Clone)]
pub struct GttsAudioProvider {
    client: reqwest::Client,
    api_url: String,
    language: LanguageCode,
}

impl GttsAudioProvider {
    pub fn new(language: impl Into<LanguageCode>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            language: language.into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, ProviderError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let params = [
            ("ie", "UTF-8"),
            ("q", chunk),
            ("tl", self.language.as_str()),
            ("client", "tw-ob"),
            ("total", total.as_str()),
            ("idx", idx.as_str()),
            ("textlen", textlen.as_str()),
        ];

        let response = self
            .client
            .get(&self.api_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&params)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(ProviderError::ApiError(format!("HTTP {}", status)));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl AudioProvider for GttsAudioProvider {
    async fn get_audio(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ProviderError::TextRejected("no text to speak".to_string()));
        }

        tracing::debug!("Synthesizing {} chunk(s) in {}", chunks.len(), self.language);

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len()).await?);
        }

        if audio.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(audio)
    }

    fn get_file_name(&self, identity_token: &str) -> String {
        format!("{identity_token}_gtts.mp3")
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "gTTS".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

/// Split `text` on whitespace into chunks of at most `max_chars` characters.
/// Words longer than the limit are cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.len() } else { word.len() + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
