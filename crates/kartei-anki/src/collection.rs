use std::path::PathBuf;
use std::sync::Arc;

use crate::error::CollectionError;
use crate::schema::{NewNote, NoteId, NoteSchema, SchemaSpec};

/// Storage capability of the host flashcard application.
///
/// Implementations are handed to [`CardService`](crate::CardService) by the
/// caller; nothing in this crate reaches for a global collection.
#[async_trait::async_trait]
pub trait Collection: Send + Sync {
    /// Look up a schema (note type) by name
    async fn find_schema(&self, name: &str) -> Result<Option<NoteSchema>, CollectionError>;

    /// Create a schema. Fails if one with the same name exists.
    async fn create_schema(&self, spec: &SchemaSpec) -> Result<NoteSchema, CollectionError>;

    /// Notes of `schema` whose `field` equals `value`
    async fn find_notes(
        &self,
        schema: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<NoteId>, CollectionError>;

    async fn delete_notes(&self, ids: &[NoteId]) -> Result<(), CollectionError>;

    /// Add a note to the named deck
    async fn add_note(&self, deck: &str, note: &NewNote) -> Result<NoteId, CollectionError>;

    /// Persist pending changes
    async fn flush(&self) -> Result<(), CollectionError> {
        Ok(())
    }

    async fn media_dir(&self) -> Result<PathBuf, CollectionError>;

    /// Write a media file, overwriting an existing file of the same name
    async fn write_media(&self, filename: &str, data: &[u8]) -> Result<(), CollectionError>;

    async fn deck_names(&self) -> Result<Vec<String>, CollectionError>;
}

pub type CollectionHandle = Arc<dyn Collection>;
