pub mod card;
pub mod error;
pub mod identity;
pub mod template;

pub use card::{AudioCard, AudioSource, CardFields, CardState, UniqueId, sound_tag};
pub use error::CardError;
pub use identity::{AsciiNormalizer, IdentityNormalizer};
pub use template::{CardTemplate, DirTemplateLoader, TemplateError, TemplateLoader, TemplatePart};
