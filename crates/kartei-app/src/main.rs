use atty::Stream;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod generate;
mod profile;
mod prompt;
mod settings;
mod state;

#[cfg(test)]
mod tests;

use self::cli::Args;
use self::generate::{CardRequest, Outcome};
use self::profile::ProfileStore;
use self::prompt::{Prompter, TerminalPrompter};
use self::settings::{SettingsStatus, ensure_settings};
use self::state::{AppState, Backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let interactive = atty::is(Stream::Stdin);

    if !interactive && args.term.is_none() {
        anyhow::bail!("No term given and stdin is not a terminal");
    }

    let mut prompter = TerminalPrompter::stdio();
    run(args, &mut prompter).await
}

async fn run(args: Args, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let store = ProfileStore::from_env()?;
    store.init_user_config()?;

    if !store.has_profile(&args.profile) {
        store.add_profile_from_default(&args.profile)?;
    }

    let mut profile_config = store.load_user_profile(&args.profile)?;
    let mut config = profile_config.clone();
    config.apply_process_env();
    args.apply(&mut config);

    match ensure_settings(&mut config, prompter)? {
        SettingsStatus::Complete => {}
        SettingsStatus::Updated => {
            profile_config.vocab.api_key = config.vocab.api_key.clone();
            profile_config.vocab.target_language = config.vocab.target_language.clone();
            let file = store.save_user_profile(&args.profile, &profile_config)?;
            tracing::info!("Saved settings to {}", file.display());
        }
        SettingsStatus::Missing => {
            prompter.warn("OpenAI configuration required to generate card.");
            return Ok(());
        }
    }

    let Some(request) = read_request(&args, &config.anki.deck, prompter)? else {
        return Ok(());
    };

    let state = AppState::new(&config, args.dry_run)?;
    state.check_backend().await?;

    if let Backend::Anki(_) = state.backend {
        let decks = state.deck_names().await?;
        if !decks.contains(&request.deck) {
            prompter.warn(&format!(
                "Deck {} does not exist. Available decks: {}",
                request.deck,
                decks.join(", ")
            ));
            return Ok(());
        }
    }

    let outcome = state.generator(args.yes).run(request, prompter).await?;

    if let (Outcome::Saved { .. }, Backend::Memory(memory)) = (&outcome, &state.backend) {
        for note in memory.notes().await {
            prompter.info(&format!("[dry run] {} in deck {}:", note.model_name, note.deck));
            for field in &note.fields {
                prompter.info(&format!("  {}: {}", field.name, field.value));
            }
        }
    }

    Ok(())
}

/// Term, context and deck from the command line, asking for what is missing
fn read_request(
    args: &Args,
    default_deck: &str,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Option<CardRequest>> {
    if let Some(term) = args.term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(CardRequest {
            term: term.to_string(),
            context: args.context.clone().unwrap_or_default(),
            deck: default_deck.to_string(),
        }));
    }

    let Some(term) = prompter.ask("Term", None)?.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let context = match &args.context {
        Some(context) => context.clone(),
        None => prompter.ask("Context (optional)", None)?.unwrap_or_default(),
    };

    let deck = match &args.deck {
        Some(deck) => deck.clone(),
        None => prompter
            .ask("Deck", Some(default_deck))?
            .unwrap_or_else(|| default_deck.to_string()),
    };

    Ok(Some(CardRequest {
        term,
        context,
        deck,
    }))
}
