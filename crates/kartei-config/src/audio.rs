use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_language() -> String {
    "de".to_string()
}

fn default_api_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Synthesize sentence audio; when false cards are saved without sound
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Speech language code
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            language: default_language(),
            api_url: default_api_url(),
        }
    }
}
