use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::collection::Collection;
use crate::error::CollectionError;
use crate::schema::{NamedTemplate, NewNote, NoteField, NoteId, NoteSchema, SchemaSpec};

/// In-process [`Collection`], used for dry runs and tests.
///
/// Media is kept in memory and, when a media directory is configured, also
/// written to disk.
#[derive(Default)]
pub struct MemoryCollection {
    state: Mutex<MemoryState>,
    media_dir: Option<PathBuf>,
    fail_media_writes: bool,
    fail_note_adds: bool,
}

#[derive(Default)]
struct MemoryState {
    schemas: Vec<NoteSchema>,
    notes: Vec<StoredNote>,
    media: HashMap<String, Vec<u8>>,
    decks: BTreeSet<String>,
    next_id: i64,
    schemas_created: usize,
    flushes: usize,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A note held by a [`MemoryCollection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNote {
    pub id: NoteId,
    pub deck: String,
    pub model_name: String,
    pub fields: Vec<NoteField>,
    pub tags: Vec<String>,
}

impl StoredNote {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write media files into `dir`
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(dir.into());
        self
    }

    /// Make every media write fail
    pub fn fail_media_writes(mut self) -> Self {
        self.fail_media_writes = true;
        self
    }

    /// Make every note insert fail
    pub fn fail_note_adds(mut self) -> Self {
        self.fail_note_adds = true;
        self
    }

    pub async fn notes(&self) -> Vec<StoredNote> {
        self.state.lock().await.notes.clone()
    }

    pub async fn schemas(&self) -> Vec<NoteSchema> {
        self.state.lock().await.schemas.clone()
    }

    /// How many times a schema was created
    pub async fn schemas_created(&self) -> usize {
        self.state.lock().await.schemas_created
    }

    pub async fn flushes(&self) -> usize {
        self.state.lock().await.flushes
    }

    pub async fn media(&self, filename: &str) -> Option<Vec<u8>> {
        self.state.lock().await.media.get(filename).cloned()
    }

    /// Seed a note directly, bypassing schema checks
    pub async fn insert_raw(&self, note: StoredNote) {
        let mut state = self.state.lock().await;
        state.next_id = state.next_id.max(note.id);
        state.notes.push(note);
    }
}

#[async_trait::async_trait]
impl Collection for MemoryCollection {
    async fn find_schema(&self, name: &str) -> Result<Option<NoteSchema>, CollectionError> {
        let state = self.state.lock().await;
        Ok(state.schemas.iter().find(|s| s.name == name).cloned())
    }

    async fn create_schema(&self, spec: &SchemaSpec) -> Result<NoteSchema, CollectionError> {
        let mut state = self.state.lock().await;

        if state.schemas.iter().any(|s| s.name == spec.name) {
            return Err(CollectionError::Backend(format!(
                "Model name already exists: {}",
                spec.name
            )));
        }

        let schema = NoteSchema {
            id: state.next_id(),
            name: spec.name.clone(),
            fields: spec.fields.clone(),
            templates: vec![NamedTemplate {
                name: spec.template_name.clone(),
                qfmt: spec.template.qfmt.clone(),
                afmt: spec.template.afmt.clone(),
            }],
            css: spec.template.css.clone(),
        };

        state.schemas.push(schema.clone());
        state.schemas_created += 1;
        Ok(schema)
    }

    async fn find_notes(
        &self,
        schema: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<NoteId>, CollectionError> {
        let state = self.state.lock().await;
        Ok(state
            .notes
            .iter()
            .filter(|n| n.model_name == schema && n.field(field) == Some(value))
            .map(|n| n.id)
            .collect())
    }

    async fn delete_notes(&self, ids: &[NoteId]) -> Result<(), CollectionError> {
        let mut state = self.state.lock().await;
        state.notes.retain(|n| !ids.contains(&n.id));
        Ok(())
    }

    async fn add_note(&self, deck: &str, note: &NewNote) -> Result<NoteId, CollectionError> {
        if self.fail_note_adds {
            return Err(CollectionError::Backend("cannot create note".to_string()));
        }

        let mut state = self.state.lock().await;

        if !state.schemas.iter().any(|s| s.name == note.model_name) {
            return Err(CollectionError::Backend(format!(
                "model was not found: {}",
                note.model_name
            )));
        }

        let id = state.next_id();
        state.decks.insert(deck.to_string());
        state.notes.push(StoredNote {
            id,
            deck: deck.to_string(),
            model_name: note.model_name.clone(),
            fields: note.fields().to_vec(),
            tags: note.tags.clone(),
        });
        Ok(id)
    }

    async fn flush(&self) -> Result<(), CollectionError> {
        self.state.lock().await.flushes += 1;
        Ok(())
    }

    async fn media_dir(&self) -> Result<PathBuf, CollectionError> {
        self.media_dir
            .clone()
            .ok_or(CollectionError::Unsupported("media_dir"))
    }

    async fn write_media(&self, filename: &str, data: &[u8]) -> Result<(), CollectionError> {
        if self.fail_media_writes {
            return Err(CollectionError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "media folder is read-only",
            )));
        }

        if let Some(dir) = &self.media_dir {
            tokio::fs::write(dir.join(filename), data).await?;
        }

        self.state
            .lock()
            .await
            .media
            .insert(filename.to_string(), data.to_vec());
        Ok(())
    }

    async fn deck_names(&self) -> Result<Vec<String>, CollectionError> {
        let state = self.state.lock().await;
        let mut decks = state.decks.clone();
        decks.insert("Default".to_string());
        Ok(decks.into_iter().collect())
    }
}
