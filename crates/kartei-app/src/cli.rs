use clap::Parser;

use crate::profile::MAIN_PROFILE;

/// Generate a German vocabulary card with an example sentence and audio,
/// and save it to Anki.
#[derive(Debug, Parser)]
#[command(name = "kartei", version)]
pub struct Args {
    /// Term to look up; asked for when omitted
    pub term: Option<String>,

    /// Free text steering the example sentence
    #[arg(short, long)]
    pub context: Option<String>,

    /// Destination deck (defaults to the profile's deck)
    #[arg(short, long)]
    pub deck: Option<String>,

    #[arg(short, long, default_value = MAIN_PROFILE)]
    pub profile: String,

    /// Save without sentence audio
    #[arg(long)]
    pub no_audio: bool,

    /// Keep the card in memory instead of saving it to Anki
    #[arg(long)]
    pub dry_run: bool,

    /// Save without a preview
    #[arg(short, long)]
    pub yes: bool,

    /// Directory overriding the bundled card templates
    #[arg(long)]
    pub templates_dir: Option<String>,
}

impl Args {
    /// Apply command line overrides to a loaded profile
    pub fn apply(&self, config: &mut kartei_config::Config) {
        if let Some(deck) = &self.deck {
            config.anki.deck = deck.clone();
        }
        if let Some(dir) = &self.templates_dir {
            config.templates_dir = Some(dir.clone());
        }
        if self.no_audio {
            config.audio.enabled = false;
        }
    }
}
