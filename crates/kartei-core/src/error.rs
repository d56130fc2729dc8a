use kartei_provider::ProviderError;

use crate::template::TemplateError;

/// Failure while building a card. Nothing has been persisted when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Invalid card: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}
