use kartei_anki::{CardService, SaveError};
use kartei_core::{AudioSource, CardError, CardTemplate};
use kartei_lang_german::GermanCard;
use kartei_provider::{AudioProvider, VocabProvider};

use crate::prompt::{PreviewChoice, Prompter};

/// Term, context and destination deck entered by the user
#[derive(Debug, Clone)]
pub struct CardRequest {
    pub term: String,
    pub context: String,
    pub deck: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved { term: String, removed: usize },
    Cancelled,
    Failed,
}

pub struct Generator<'a> {
    pub vocab: &'a dyn VocabProvider,
    /// `None` saves cards without sentence audio
    pub audio: Option<&'a dyn AudioProvider>,
    pub template: CardTemplate,
    pub service: &'a CardService,
    /// Save the first generated card without a preview
    pub auto_save: bool,
}

impl Generator<'_> {
    /// Generate, preview and save one card. Regenerating restarts the lookup
    /// with the (possibly updated) context.
    pub async fn run(
        &self,
        mut request: CardRequest,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<Outcome> {
        loop {
            let Some(card) = self.generate(&request, prompter).await else {
                return Ok(Outcome::Failed);
            };

            let choice = if self.auto_save {
                PreviewChoice::Save
            } else {
                prompter.preview(&card)?
            };

            match choice {
                PreviewChoice::Save => return Ok(self.save(&card, &request.deck, prompter).await),
                PreviewChoice::Cancel => {
                    tracing::info!("Card for {} cancelled", card.term());
                    return Ok(Outcome::Cancelled);
                }
                PreviewChoice::Regenerate { context } => {
                    if let Some(context) = context {
                        request.context = context;
                    }
                    tracing::info!("Regenerating card for {}", request.term);
                }
            }
        }
    }

    async fn generate(
        &self,
        request: &CardRequest,
        prompter: &mut dyn Prompter,
    ) -> Option<GermanCard> {
        let audio = match self.audio {
            Some(provider) => AudioSource::Provider(provider),
            None => AudioSource::Skip,
        };

        let result = GermanCard::create_with_template(
            &request.term,
            &request.context,
            self.vocab,
            audio,
            self.template.clone(),
        )
        .await;

        match result {
            Ok(card) => Some(card),
            Err(CardError::Validation(reason)) => {
                prompter.warn(&format!("Invalid card data: {reason}"));
                None
            }
            Err(e) => {
                let providers = self.provider_names();
                tracing::error!(
                    "Card generation for {} via {} failed: {}",
                    request.term,
                    providers,
                    e
                );
                prompter.warn(&format!("Failed to generate card via {providers}: {e}"));
                None
            }
        }
    }

    /// e.g. `OpenAI + gTTS`
    fn provider_names(&self) -> String {
        match self.audio {
            Some(audio) => format!("{} + {}", self.vocab.metadata().name, audio.metadata().name),
            None => self.vocab.metadata().name,
        }
    }

    async fn save(&self, card: &GermanCard, deck: &str, prompter: &mut dyn Prompter) -> Outcome {
        match self.service.save_card(card, deck).await {
            Ok(removed) => {
                prompter.info(&success_message(card.term(), removed));
                Outcome::Saved {
                    term: card.term().to_string(),
                    removed,
                }
            }
            Err(SaveError::Validation(reason)) => {
                prompter.warn(&format!("Invalid card data: {reason}"));
                Outcome::Failed
            }
            Err(e) => {
                tracing::error!("Saving card for {} failed: {}", card.term(), e);
                prompter.warn(&format!("Failed to create card: {e}"));
                Outcome::Failed
            }
        }
    }
}

pub fn success_message(term: &str, removed: usize) -> String {
    let mut message = format!("German card created: {term}");
    if removed > 0 {
        message.push_str(&format!(", Removed duplicate cards: {removed}"));
    }
    message
}
