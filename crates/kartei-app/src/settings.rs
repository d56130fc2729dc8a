use kartei_config::Config;

use crate::prompt::Prompter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsStatus {
    /// Nothing was missing
    Complete,
    /// Missing values were entered and should be written back
    Updated,
    Missing,
}

/// Make sure the vocabulary backend is configured, asking for the API key
/// and target language when either is missing.
pub fn ensure_settings(
    config: &mut Config,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<SettingsStatus> {
    if config.vocab.is_complete() {
        return Ok(SettingsStatus::Complete);
    }

    let current_key = config.vocab.api_key.trim().to_string();
    let key_default = (!current_key.is_empty()).then_some(current_key.as_str());
    let Some(api_key) = prompter.ask("OpenAI API key", key_default)? else {
        return Ok(SettingsStatus::Missing);
    };

    let language_default = match config.vocab.target_language.trim() {
        "" => "English",
        language => language,
    };
    let Some(target_language) = prompter.ask("Target language", Some(language_default))? else {
        return Ok(SettingsStatus::Missing);
    };

    if api_key.is_empty() || target_language.is_empty() {
        return Ok(SettingsStatus::Missing);
    }

    config.vocab.api_key = api_key;
    config.vocab.target_language = target_language;
    Ok(SettingsStatus::Updated)
}
