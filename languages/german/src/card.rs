use kartei_core::{
    AudioCard, AudioSource, CardError, CardFields, CardState, CardTemplate, IdentityNormalizer,
    UniqueId, sound_tag,
};
use kartei_provider::VocabProvider;

use crate::normalizer::GermanNormalizer;
use crate::templates::contextual_template;

pub const MODEL_NAME: &str = "German Contextual Vocab";
pub const TEMPLATE_NAME: &str = "Contextual Audio Card";

/// Field holding the identity token
pub const ID_FIELD: &str = "id";

/// German term with an example sentence, translations and sentence audio
#[derive(Debug, Clone)]
pub struct GermanCard {
    id: String,
    term: String,
    context: String,
    sentence: String,
    term_translation: String,
    sentence_translation: String,
    audio_data: Option<Vec<u8>>,
    audio_filename: String,
    state: CardState,
    template: CardTemplate,
}

impl GermanCard {
    /// Unpopulated card using the bundled template
    pub fn new(term: &str, context: &str) -> Self {
        Self::with_template(term, context, contextual_template())
    }

    pub fn with_template(term: &str, context: &str, template: CardTemplate) -> Self {
        Self {
            id: GermanNormalizer.identity_token(term),
            term: term.to_string(),
            context: context.to_string(),
            sentence: String::new(),
            term_translation: String::new(),
            sentence_translation: String::new(),
            audio_data: None,
            audio_filename: String::new(),
            state: CardState::Unpopulated,
            template,
        }
    }

    /// Build a card from user input: look the term up, then synthesize the
    /// example sentence unless audio is skipped.
    pub async fn create_from_user_input(
        term: &str,
        context: &str,
        vocab_provider: &dyn VocabProvider,
        audio: AudioSource<'_>,
    ) -> Result<Self, CardError> {
        Self::create_with_template(term, context, vocab_provider, audio, contextual_template())
            .await
    }

    pub async fn create_with_template(
        term: &str,
        context: &str,
        vocab_provider: &dyn VocabProvider,
        audio: AudioSource<'_>,
        template: CardTemplate,
    ) -> Result<Self, CardError> {
        let item = vocab_provider.get_vocab(term, context).await?;

        // The provider may correct the term, so identity follows its answer
        let mut card = Self::with_template(&item.term, context, template);
        card.sentence = item.sentence;
        card.term_translation = item.term_translation;
        card.sentence_translation = item.sentence_translation;
        card.state = CardState::VocabFetched;

        tracing::debug!("Vocab fetched for {:?}: id={}", card.term, card.id);

        if !card.is_valid() {
            return Err(CardError::Validation(format!(
                "term {:?} has no letters or digits to build an id from",
                card.term
            )));
        }

        match audio {
            AudioSource::Provider(provider) => {
                let data = provider.get_audio(&card.sentence).await?;
                card.audio_filename = provider.get_file_name(&card.id);
                card.audio_data = Some(data);
                card.state = CardState::Ready;
            }
            AudioSource::Skip => {
                card.state = CardState::ReadyNoAudio;
            }
        }

        Ok(card)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn term_translation(&self) -> &str {
        &self.term_translation
    }

    pub fn sentence_translation(&self) -> &str {
        &self.sentence_translation
    }
}

impl AudioCard for GermanCard {
    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn template_name(&self) -> &str {
        TEMPLATE_NAME
    }

    fn unique_id(&self) -> UniqueId {
        UniqueId::new(ID_FIELD, self.id.clone())
    }

    fn fields(&self) -> CardFields {
        CardFields::new()
            .with(ID_FIELD, self.id.clone())
            .with("term", self.term.clone())
            .with("sentence", self.sentence.clone())
            .with("sentence_audio", sound_tag(&self.audio_filename))
            .with("term_translation", self.term_translation.clone())
            .with("sentence_translation", self.sentence_translation.clone())
            .with("context", self.context.clone())
    }

    fn template(&self) -> &CardTemplate {
        &self.template
    }

    fn audio_data(&self) -> Option<&[u8]> {
        self.audio_data.as_deref()
    }

    fn audio_filename(&self) -> &str {
        &self.audio_filename
    }

    fn state(&self) -> CardState {
        self.state
    }
}
