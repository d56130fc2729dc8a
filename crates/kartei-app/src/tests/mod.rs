use std::collections::VecDeque;
use std::sync::Mutex;

use kartei_lang_german::GermanCard;
use kartei_provider::{AudioProvider, ProviderError, ProviderMetadata, VocabItem, VocabProvider};

use crate::prompt::{PreviewChoice, Prompter};

mod settings_tests;

/// Prompter answering from fixed scripts and recording what it was shown
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<String>,
    pub choices: VecDeque<PreviewChoice>,
    pub asked: Vec<String>,
    pub previews: Vec<GermanCard>,
    pub infos: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScriptedPrompter {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_choices(choices: Vec<PreviewChoice>) -> Self {
        Self {
            choices: choices.into(),
            ..Default::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, label: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        self.asked.push(label.to_string());
        Ok(self.answers.pop_front().map(|answer| {
            if answer.is_empty() {
                default.unwrap_or_default().to_string()
            } else {
                answer
            }
        }))
    }

    fn preview(&mut self, card: &GermanCard) -> anyhow::Result<PreviewChoice> {
        self.previews.push(card.clone());
        Ok(self.choices.pop_front().unwrap_or(PreviewChoice::Cancel))
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// Vocab backend echoing the term and context back
#[derive(Default)]
pub struct StubVocab {
    pub calls: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl StubVocab {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VocabProvider for StubVocab {
    async fn get_vocab(&self, term: &str, context: &str) -> Result<VocabItem, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((term.to_string(), context.to_string()));

        if self.fail {
            return Err(ProviderError::ApiError("HTTP 503 Service Unavailable".to_string()));
        }

        Ok(VocabItem::new(
            term,
            format!("{term}_t"),
            format!("S {term}"),
            format!("ST {term}"),
        ))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "stub".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

pub struct StubAudio;

#[async_trait::async_trait]
impl AudioProvider for StubAudio {
    async fn get_audio(&self, _text: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(b"dummy".to_vec())
    }

    fn get_file_name(&self, identity_token: &str) -> String {
        format!("{identity_token}_dummy.mp3")
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "stub".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}
