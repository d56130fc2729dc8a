use kartei_core::{AudioCard, UniqueId};
use tokio::sync::Mutex;

use crate::collection::CollectionHandle;
use crate::error::{CollectionError, MediaWriteError, SaveError};
use crate::schema::{NoteId, NoteSchema, SchemaSpec};

/// Reconciles generated cards into a collection.
///
/// Enforces at most one stored note per identity per card kind: the schema
/// is created on first use, notes with the same identity are deleted, then
/// the new note is inserted. Saves are serialized, so ensure-schema and
/// delete-then-insert run as one critical section per service.
pub struct CardService {
    collection: CollectionHandle,
    write_lock: Mutex<()>,
}

impl CardService {
    pub fn new(collection: CollectionHandle) -> Self {
        Self {
            collection,
            write_lock: Mutex::new(()),
        }
    }

    pub fn collection(&self) -> &CollectionHandle {
        &self.collection
    }

    /// Save `card` into `deck`, replacing notes with the same identity.
    /// Returns how many notes were replaced.
    pub async fn save_card(&self, card: &dyn AudioCard, deck: &str) -> Result<usize, SaveError> {
        if !card.state().is_ready() {
            return Err(SaveError::Validation(format!(
                "card is not ready to be saved ({})",
                card.state().as_str()
            )));
        }
        if !card.is_valid() {
            return Err(SaveError::Validation("card has an empty identity".to_string()));
        }

        let _guard = self.write_lock.lock().await;

        let schema = self.ensure_schema(card).await?;
        let unique_id = card.unique_id();

        let removed = self.delete_duplicates(&schema, &unique_id).await?;
        let note_id = self.insert_note(&schema, card, deck).await?;

        tracing::info!(
            "Saved note {} ({}={}) to deck {}, replaced {}",
            note_id,
            unique_id.field,
            unique_id.value,
            deck,
            removed
        );

        match self.write_audio(card).await {
            Ok(Some(filename)) => tracing::debug!("Wrote media file {}", filename),
            Ok(None) => {}
            Err(e) => tracing::warn!("{}", e),
        }

        Ok(removed)
    }

    /// Look up the card kind's schema, creating it on first use
    async fn ensure_schema(&self, card: &dyn AudioCard) -> Result<NoteSchema, CollectionError> {
        let name = card.model_name();
        if let Some(schema) = self.collection.find_schema(name).await? {
            return Ok(schema);
        }

        let spec = SchemaSpec::from_card(card);
        tracing::info!("Creating note type {} with {} fields", name, spec.fields.len());

        match self.collection.create_schema(&spec).await {
            Ok(schema) => Ok(schema),
            Err(e) => {
                // Another writer may have created it in the meantime
                match self.collection.find_schema(name).await? {
                    Some(schema) => {
                        tracing::debug!("Note type {} appeared concurrently", name);
                        Ok(schema)
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn delete_duplicates(
        &self,
        schema: &NoteSchema,
        unique_id: &UniqueId,
    ) -> Result<usize, CollectionError> {
        if !schema.has_field(&unique_id.field) {
            return Err(CollectionError::SchemaMismatch(format!(
                "note type {} has no {} field",
                schema.name, unique_id.field
            )));
        }

        let existing = self
            .collection
            .find_notes(&schema.name, &unique_id.field, &unique_id.value)
            .await?;

        if existing.is_empty() {
            return Ok(0);
        }

        if existing.len() > 1 {
            tracing::warn!(
                "Found {} notes with {}={}, removing all",
                existing.len(),
                unique_id.field,
                unique_id.value
            );
        }

        self.collection.delete_notes(&existing).await?;
        Ok(existing.len())
    }

    async fn insert_note(
        &self,
        schema: &NoteSchema,
        card: &dyn AudioCard,
        deck: &str,
    ) -> Result<NoteId, CollectionError> {
        let mut note = schema.new_note();

        for (name, value) in card.fields().iter() {
            if !note.set(name, value) {
                tracing::warn!(
                    "Note type {} has no field {}, value dropped",
                    schema.name,
                    name
                );
            }
        }

        let note_id = self.collection.add_note(deck, &note).await?;
        self.collection.flush().await?;
        Ok(note_id)
    }

    /// Best effort: the note is already saved when this runs
    async fn write_audio(&self, card: &dyn AudioCard) -> Result<Option<String>, MediaWriteError> {
        let filename = card.audio_filename();
        let Some(data) = card.audio_data() else {
            return Ok(None);
        };
        if filename.is_empty() {
            return Ok(None);
        }

        self.collection
            .write_media(filename, data)
            .await
            .map_err(|source| MediaWriteError {
                filename: filename.to_string(),
                source,
            })?;

        Ok(Some(filename.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kartei_core::{CardFields, CardState, CardTemplate, sound_tag};

    use super::*;
    use crate::collection::Collection;
    use crate::memory::{MemoryCollection, StoredNote};
    use crate::schema::{NewNote, NoteField};

    struct TestCard {
        id: String,
        term: String,
        audio: Option<Vec<u8>>,
        audio_filename: String,
        state: CardState,
        template: CardTemplate,
    }

    impl TestCard {
        fn new(term: &str) -> Self {
            let id = term.to_lowercase();
            Self {
                audio_filename: format!("{id}_test.mp3"),
                id,
                term: term.to_string(),
                audio: Some(b"dummy".to_vec()),
                state: CardState::Ready,
                template: CardTemplate::new("{{term}}{{audio}}", "{{term}}"),
            }
        }

        fn without_audio(mut self) -> Self {
            self.audio = None;
            self.audio_filename.clear();
            self.state = CardState::ReadyNoAudio;
            self
        }
    }

    impl AudioCard for TestCard {
        fn model_name(&self) -> &str {
            "Test Vocab"
        }

        fn template_name(&self) -> &str {
            "Test Card"
        }

        fn unique_id(&self) -> UniqueId {
            UniqueId::new("id", self.id.clone())
        }

        fn fields(&self) -> CardFields {
            CardFields::new()
                .with("id", self.id.clone())
                .with("term", self.term.clone())
                .with("audio", sound_tag(&self.audio_filename))
        }

        fn template(&self) -> &CardTemplate {
            &self.template
        }

        fn audio_data(&self) -> Option<&[u8]> {
            self.audio.as_deref()
        }

        fn audio_filename(&self) -> &str {
            &self.audio_filename
        }

        fn state(&self) -> CardState {
            self.state
        }
    }

    fn service(collection: &Arc<MemoryCollection>) -> CardService {
        CardService::new(collection.clone())
    }

    #[tokio::test]
    async fn test_save_card_creates_schema_note_and_media() {
        let collection = Arc::new(MemoryCollection::new());
        let removed = service(&collection)
            .save_card(&TestCard::new("Haus"), "German")
            .await
            .unwrap();

        assert_eq!(removed, 0);

        let schemas = collection.schemas().await;
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "Test Vocab");
        assert_eq!(schemas[0].fields, vec!["id", "term", "audio"]);
        assert_eq!(schemas[0].templates[0].name, "Test Card");

        let notes = collection.notes().await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].deck, "German");
        assert_eq!(notes[0].field("id"), Some("haus"));
        assert_eq!(notes[0].field("audio"), Some("[sound:haus_test.mp3]"));
        assert_eq!(collection.flushes().await, 1);

        assert_eq!(collection.media("haus_test.mp3").await.unwrap(), b"dummy");
    }

    #[tokio::test]
    async fn test_second_save_replaces_first() {
        let collection = Arc::new(MemoryCollection::new());
        let service = service(&collection);

        let first = service.save_card(&TestCard::new("Haus"), "German").await.unwrap();
        let second = service.save_card(&TestCard::new("HAUS"), "German").await.unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);

        let notes = collection.notes().await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].field("term"), Some("HAUS"));
    }

    #[tokio::test]
    async fn test_schema_created_once() {
        let collection = Arc::new(MemoryCollection::new());
        let service = service(&collection);

        for term in ["Haus", "Hund", "Katze", "Haus"] {
            service.save_card(&TestCard::new(term), "German").await.unwrap();
        }

        assert_eq!(collection.schemas_created().await, 1);
        assert_eq!(collection.notes().await.len(), 3);
    }

    #[tokio::test]
    async fn test_clears_multiple_duplicates() {
        let collection = Arc::new(MemoryCollection::new());
        let service = service(&collection);
        service.save_card(&TestCard::new("Haus"), "German").await.unwrap();

        collection
            .insert_raw(StoredNote {
                id: 100,
                deck: "Old".to_string(),
                model_name: "Test Vocab".to_string(),
                fields: vec![NoteField {
                    name: "id".to_string(),
                    value: "haus".to_string(),
                }],
                tags: vec![],
            })
            .await;

        let removed = service.save_card(&TestCard::new("Haus"), "German").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(collection.notes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_same_identity_other_kind_untouched() {
        let collection = Arc::new(MemoryCollection::new());
        collection
            .insert_raw(StoredNote {
                id: 1,
                deck: "German".to_string(),
                model_name: "Other Vocab".to_string(),
                fields: vec![NoteField {
                    name: "id".to_string(),
                    value: "haus".to_string(),
                }],
                tags: vec![],
            })
            .await;

        let removed = service(&collection)
            .save_card(&TestCard::new("Haus"), "German")
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert_eq!(collection.notes().await.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_card_touches_nothing() {
        let collection = Arc::new(MemoryCollection::new());
        let mut card = TestCard::new("Haus");
        card.id.clear();

        let err = service(&collection).save_card(&card, "German").await.unwrap_err();

        assert!(matches!(err, SaveError::Validation(_)));
        assert_eq!(collection.schemas_created().await, 0);
        assert!(collection.notes().await.is_empty());
    }

    #[tokio::test]
    async fn test_unready_card_rejected() {
        let collection = Arc::new(MemoryCollection::new());
        let mut card = TestCard::new("Haus");
        card.state = CardState::VocabFetched;

        let err = service(&collection).save_card(&card, "German").await.unwrap_err();

        assert!(matches!(err, SaveError::Validation(_)));
        assert!(collection.schemas().await.is_empty());
    }

    #[tokio::test]
    async fn test_media_failure_is_suppressed() {
        let collection = Arc::new(MemoryCollection::new().fail_media_writes());
        let removed = service(&collection)
            .save_card(&TestCard::new("Haus"), "German")
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert_eq!(collection.notes().await.len(), 1);
        assert!(collection.media("haus_test.mp3").await.is_none());
    }

    #[tokio::test]
    async fn test_no_audio_skips_media() {
        let collection = Arc::new(MemoryCollection::new());
        service(&collection)
            .save_card(&TestCard::new("Haus").without_audio(), "German")
            .await
            .unwrap();

        let notes = collection.notes().await;
        assert_eq!(notes[0].field("audio"), Some(""));
        assert!(collection.media("haus_test.mp3").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_failure_is_persistence_error() {
        let collection = Arc::new(MemoryCollection::new().fail_note_adds());
        let err = service(&collection)
            .save_card(&TestCard::new("Haus"), "German")
            .await
            .unwrap_err();

        assert!(matches!(err, SaveError::Persistence(_)));
        assert!(collection.media("haus_test.mp3").await.is_none());
    }

    #[tokio::test]
    async fn test_stale_schema_without_identity_field() {
        let collection = Arc::new(MemoryCollection::new());
        collection
            .create_schema(&SchemaSpec {
                name: "Test Vocab".to_string(),
                fields: vec!["term".to_string()],
                template_name: "Old".to_string(),
                template: CardTemplate::new("{{term}}", "{{term}}"),
            })
            .await
            .unwrap();

        let err = service(&collection)
            .save_card(&TestCard::new("Haus"), "German")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SaveError::Persistence(CollectionError::SchemaMismatch(_))
        ));
        assert!(collection.notes().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_saves_keep_one_note() {
        let collection = Arc::new(MemoryCollection::new());
        let service = Arc::new(service(&collection));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.save_card(&TestCard::new("Haus"), "German").await
            }));
        }

        let mut removed_total = 0;
        for handle in handles {
            removed_total += handle.await.unwrap().unwrap();
        }

        assert_eq!(removed_total, 7);
        assert_eq!(collection.notes().await.len(), 1);
        assert_eq!(collection.schemas_created().await, 1);
    }

    /// Misses the first schema lookup, as if another writer created the
    /// schema between lookup and creation
    struct LateSchemaCollection {
        inner: Arc<MemoryCollection>,
        lookups: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Collection for LateSchemaCollection {
        async fn find_schema(&self, name: &str) -> Result<Option<NoteSchema>, CollectionError> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(None);
            }
            self.inner.find_schema(name).await
        }

        async fn create_schema(&self, spec: &SchemaSpec) -> Result<NoteSchema, CollectionError> {
            self.inner.create_schema(spec).await
        }

        async fn find_notes(
            &self,
            schema: &str,
            field: &str,
            value: &str,
        ) -> Result<Vec<NoteId>, CollectionError> {
            self.inner.find_notes(schema, field, value).await
        }

        async fn delete_notes(&self, ids: &[NoteId]) -> Result<(), CollectionError> {
            self.inner.delete_notes(ids).await
        }

        async fn add_note(&self, deck: &str, note: &NewNote) -> Result<NoteId, CollectionError> {
            self.inner.add_note(deck, note).await
        }

        async fn media_dir(&self) -> Result<PathBuf, CollectionError> {
            self.inner.media_dir().await
        }

        async fn write_media(&self, filename: &str, data: &[u8]) -> Result<(), CollectionError> {
            self.inner.write_media(filename, data).await
        }

        async fn deck_names(&self) -> Result<Vec<String>, CollectionError> {
            self.inner.deck_names().await
        }
    }

    #[tokio::test]
    async fn test_schema_created_by_other_writer_is_reused() {
        let inner = Arc::new(MemoryCollection::new());
        let card = TestCard::new("Haus");
        inner.create_schema(&SchemaSpec::from_card(&card)).await.unwrap();

        let collection = Arc::new(LateSchemaCollection {
            inner: inner.clone(),
            lookups: AtomicUsize::new(0),
        });
        let service = CardService::new(collection.clone());

        let removed = service.save_card(&card, "German").await.unwrap();

        assert_eq!(removed, 0);
        assert_eq!(collection.lookups.load(Ordering::SeqCst), 2);
        assert_eq!(inner.schemas_created().await, 1);
        assert_eq!(inner.notes().await.len(), 1);
    }
}
