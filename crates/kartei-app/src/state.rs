use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kartei_anki::{
    AnkiConnectClient, AnkiConnectCollection, CardService, CollectionHandle, MemoryCollection,
};
use kartei_config::Config;
use kartei_core::{CardTemplate, DirTemplateLoader};
use kartei_lang_german::{
    CONTEXTUAL_KIND, GttsAudioProvider, OpenAiVocabProvider, contextual_template,
};
use kartei_provider::{AudioProvider, VocabProvider};

use crate::generate::Generator;

/// Where saved cards go
pub enum Backend {
    Anki(AnkiConnectClient),
    /// Dry run: nothing leaves the process
    Memory(Arc<MemoryCollection>),
}

/// Providers, storage and template wired from one [`Config`]
pub struct AppState {
    pub backend: Backend,
    pub vocab: OpenAiVocabProvider,
    pub audio: Option<GttsAudioProvider>,
    pub template: CardTemplate,
    pub service: CardService,
}

impl AppState {
    pub fn new(config: &Config, dry_run: bool) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        let vocab = OpenAiVocabProvider::new(
            config.vocab.api_key.clone(),
            config.vocab.target_language.clone(),
        )
        .with_client(client.clone())
        .with_api_url(config.vocab.api_url.clone())
        .with_model(config.vocab.model.clone())
        .with_temperature(config.vocab.temperature);

        let audio = config.audio.enabled.then(|| {
            GttsAudioProvider::new(config.audio.language.clone())
                .with_client(client.clone())
                .with_api_url(config.audio.api_url.clone())
        });

        tracing::info!(
            "Vocabulary from {}, audio from {}",
            vocab.metadata().name,
            audio
                .as_ref()
                .map_or_else(|| "nowhere".to_string(), |a| a.metadata().name)
        );

        let template = match &config.templates_dir {
            Some(dir) => {
                let loader = DirTemplateLoader::new(dir);
                CardTemplate::load(&loader, CONTEXTUAL_KIND)
                    .with_context(|| format!("Failed to load card template from {dir}"))?
            }
            None => contextual_template(),
        };

        let (backend, collection) = if dry_run {
            let memory = Arc::new(MemoryCollection::new());
            let collection: CollectionHandle = memory.clone();
            (Backend::Memory(memory), collection)
        } else {
            let anki = AnkiConnectClient::with_client(config.anki.url.clone(), client);
            let collection: CollectionHandle = Arc::new(AnkiConnectCollection::new(anki.clone()));
            (Backend::Anki(anki), collection)
        };

        Ok(Self {
            backend,
            vocab,
            audio,
            template,
            service: CardService::new(collection),
        })
    }

    pub fn generator(&self, auto_save: bool) -> Generator<'_> {
        Generator {
            vocab: &self.vocab,
            audio: self.audio.as_ref().map(|a| a as &dyn AudioProvider),
            template: self.template.clone(),
            service: &self.service,
            auto_save,
        }
    }

    /// Fail early when Anki is not running
    pub async fn check_backend(&self) -> anyhow::Result<()> {
        if let Backend::Anki(client) = &self.backend {
            let version = client.check_connection().await.with_context(|| {
                format!("AnkiConnect is not reachable at {}", client.base_url())
            })?;
            tracing::info!("Connected to AnkiConnect v{}", version);
        }
        Ok(())
    }

    /// Deck names the backend knows about
    pub async fn deck_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.service.collection().deck_names().await?)
    }
}
