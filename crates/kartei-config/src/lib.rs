use std::env;

use serde::{Deserialize, Serialize};

use self::anki::AnkiConfig;
use self::audio::AudioConfig;
use self::vocab::VocabConfig;

pub mod anki;
pub mod audio;
pub mod vocab;

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub anki: AnkiConfig,
    pub vocab: VocabConfig,
    pub audio: AudioConfig,

    /// Directory with `<kind>/{front.html,back.html,style.css}` overriding
    /// the bundled card templates
    pub templates_dir: Option<String>,
    /// Timeout for every backend HTTP request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anki: AnkiConfig::default(),
            vocab: VocabConfig::default(),
            audio: AudioConfig::default(),
            templates_dir: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    /// Override fields from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    /// Defaults overridden by whatever `lookup` returns for the known keys
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        config.apply_env(lookup);
        config
    }

    /// Override fields that have a value in `lookup`. Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = get("OPENAI_API_KEY") {
            self.vocab.api_key = api_key;
        }
        if let Some(language) = get("KARTEI_TARGET_LANGUAGE") {
            self.vocab.target_language = language;
        }
        if let Some(url) = get("ANKI_CONNECT_URL") {
            self.anki.url = url;
        }
        if let Some(deck) = get("KARTEI_DECK") {
            self.anki.deck = deck;
        }
        if let Some(timeout) = get("KARTEI_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.timeout_seconds = timeout;
        }
    }
}
