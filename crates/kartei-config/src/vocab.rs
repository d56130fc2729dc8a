use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_target_language() -> String {
    "English".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Language translations are produced in
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl VocabConfig {
    /// Both the key and the target language are needed before a lookup
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.target_language.trim().is_empty()
    }
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            target_language: default_target_language(),
            temperature: default_temperature(),
        }
    }
}
