use kartei_config::Config;

use super::ScriptedPrompter;
use crate::settings::{SettingsStatus, ensure_settings};

#[test]
fn test_complete_settings_ask_nothing() {
    let mut config = Config::default();
    config.vocab.api_key = "sk-test".to_string();
    let mut prompter = ScriptedPrompter::default();

    let status = ensure_settings(&mut config, &mut prompter).unwrap();

    assert_eq!(status, SettingsStatus::Complete);
    assert!(prompter.asked.is_empty());
}

#[test]
fn test_missing_key_is_asked_for() {
    let mut config = Config::default();
    let mut prompter = ScriptedPrompter::with_answers(&["sk-new", ""]);

    let status = ensure_settings(&mut config, &mut prompter).unwrap();

    assert_eq!(status, SettingsStatus::Updated);
    assert_eq!(prompter.asked, vec!["OpenAI API key", "Target language"]);
    assert_eq!(config.vocab.api_key, "sk-new");
    assert_eq!(config.vocab.target_language, "English");
}

#[test]
fn test_missing_language_keeps_key() {
    let mut config = Config::default();
    config.vocab.api_key = "sk-test".to_string();
    config.vocab.target_language = String::new();
    let mut prompter = ScriptedPrompter::with_answers(&["", "Spanish"]);

    let status = ensure_settings(&mut config, &mut prompter).unwrap();

    assert_eq!(status, SettingsStatus::Updated);
    assert_eq!(config.vocab.api_key, "sk-test");
    assert_eq!(config.vocab.target_language, "Spanish");
}

#[test]
fn test_closed_input_leaves_settings_missing() {
    let mut config = Config::default();
    let mut prompter = ScriptedPrompter::default();

    let status = ensure_settings(&mut config, &mut prompter).unwrap();

    assert_eq!(status, SettingsStatus::Missing);
    assert!(config.vocab.api_key.is_empty());
}

#[test]
fn test_blank_key_leaves_settings_missing() {
    let mut config = Config::default();
    let mut prompter = ScriptedPrompter::with_answers(&["", "German"]);

    let status = ensure_settings(&mut config, &mut prompter).unwrap();

    assert_eq!(status, SettingsStatus::Missing);
    assert_eq!(config.vocab.target_language, "English");
}
