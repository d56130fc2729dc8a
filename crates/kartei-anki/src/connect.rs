use std::path::PathBuf;

use crate::client::AnkiConnectClient;
use crate::collection::Collection;
use crate::error::CollectionError;
use crate::schema::{NamedTemplate, NewNote, NoteId, NoteSchema, SchemaSpec};

/// [`Collection`] backed by a running Anki with the AnkiConnect add-on
#[derive(Clone)]
pub struct AnkiConnectCollection {
    client: AnkiConnectClient,
}

impl AnkiConnectCollection {
    pub fn new(client: AnkiConnectClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AnkiConnectClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl Collection for AnkiConnectCollection {
    async fn find_schema(&self, name: &str) -> Result<Option<NoteSchema>, CollectionError> {
        let models = self.client.model_names_and_ids().await?;
        let Some(&id) = models.get(name) else {
            return Ok(None);
        };

        let fields = self.client.model_field_names(name).await?;

        let mut templates: Vec<NamedTemplate> = self
            .client
            .model_templates(name)
            .await?
            .into_iter()
            .map(|(template_name, mut sides)| NamedTemplate {
                name: template_name,
                qfmt: sides.remove("Front").unwrap_or_default(),
                afmt: sides.remove("Back").unwrap_or_default(),
            })
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));

        let css = self.client.model_styling(name).await?;

        Ok(Some(NoteSchema {
            id,
            name: name.to_string(),
            fields,
            templates,
            css: (!css.is_empty()).then_some(css),
        }))
    }

    async fn create_schema(&self, spec: &SchemaSpec) -> Result<NoteSchema, CollectionError> {
        self.client.create_model(spec).await?;

        self.find_schema(&spec.name).await?.ok_or_else(|| {
            CollectionError::Backend(format!("model {} missing after creation", spec.name))
        })
    }

    async fn find_notes(
        &self,
        schema: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<NoteId>, CollectionError> {
        let query = search_query(schema, field, value);
        tracing::debug!("Searching notes: {}", query);
        self.client.find_notes(&query).await
    }

    async fn delete_notes(&self, ids: &[NoteId]) -> Result<(), CollectionError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.client.delete_notes(ids).await
    }

    async fn add_note(&self, deck: &str, note: &NewNote) -> Result<NoteId, CollectionError> {
        self.client.add_note(deck, note).await
    }

    async fn media_dir(&self) -> Result<PathBuf, CollectionError> {
        Ok(PathBuf::from(self.client.media_dir_path().await?))
    }

    async fn write_media(&self, filename: &str, data: &[u8]) -> Result<(), CollectionError> {
        self.client.store_media_file(filename, data).await?;
        Ok(())
    }

    async fn deck_names(&self) -> Result<Vec<String>, CollectionError> {
        self.client.deck_names().await
    }
}

/// Exact-match search for one field of one note type
fn search_query(schema: &str, field: &str, value: &str) -> String {
    format!(
        "\"note:{}\" \"{}:{}\"",
        escape_search(schema),
        escape_search(field),
        escape_search(value)
    )
}

/// Escape Anki search wildcards and quoting
fn escape_search(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '*' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
