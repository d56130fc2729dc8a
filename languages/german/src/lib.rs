//! German vocabulary cards: identity folding, the bundled contextual card
//! template, and the OpenAI and gTTS providers that fill it.

pub mod card;
pub mod gtts;
pub mod normalizer;
pub mod openai;
pub mod prompts;
pub mod templates;

pub use card::{GermanCard, ID_FIELD, MODEL_NAME, TEMPLATE_NAME};
pub use gtts::GttsAudioProvider;
pub use normalizer::GermanNormalizer;
pub use openai::{ChatMessage, OpenAiVocabProvider};
pub use prompts::VocabPrompts;
pub use templates::{CONTEXTUAL_KIND, EmbeddedTemplates, contextual_template};
