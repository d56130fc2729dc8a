use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::CollectionError;
use crate::schema::{NewNote, SchemaSpec};

const API_VERSION: u32 = 6;

/// Thin AnkiConnect binding, one method per action
#[derive(Clone)]
pub struct AnkiConnectClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnkiConnectClient {
    pub fn new(base_url: String) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if AnkiConnect is available
    pub async fn check_connection(&self) -> Result<u32, CollectionError> {
        self.invoke::<u32>("version", json!({}))
            .await?
            .into_result("version")
    }

    /// Get list of deck names
    pub async fn deck_names(&self) -> Result<Vec<String>, CollectionError> {
        self.invoke::<Vec<String>>("deckNames", json!({}))
            .await?
            .into_result("deckNames")
    }

    /// Get model (note type) names mapped to their ids
    pub async fn model_names_and_ids(&self) -> Result<HashMap<String, i64>, CollectionError> {
        self.invoke::<HashMap<String, i64>>("modelNamesAndIds", json!({}))
            .await?
            .into_result("modelNamesAndIds")
    }

    /// Field names of a model, in column order
    pub async fn model_field_names(&self, model: &str) -> Result<Vec<String>, CollectionError> {
        self.invoke::<Vec<String>>("modelFieldNames", json!({ "modelName": model }))
            .await?
            .into_result("modelFieldNames")
    }

    /// Card templates of a model: template name -> {"Front": .., "Back": ..}
    pub async fn model_templates(
        &self,
        model: &str,
    ) -> Result<HashMap<String, HashMap<String, String>>, CollectionError> {
        self.invoke::<HashMap<String, HashMap<String, String>>>(
            "modelTemplates",
            json!({ "modelName": model }),
        )
        .await?
        .into_result("modelTemplates")
    }

    /// Stylesheet of a model
    pub async fn model_styling(&self, model: &str) -> Result<String, CollectionError> {
        let styling: ModelStyling = self
            .invoke::<ModelStyling>("modelStyling", json!({ "modelName": model }))
            .await?
            .into_result("modelStyling")?;
        Ok(styling.css)
    }

    /// Create a model with a single card template
    pub async fn create_model(&self, spec: &SchemaSpec) -> Result<(), CollectionError> {
        let mut params = json!({
            "modelName": spec.name,
            "inOrderFields": spec.fields,
            "isCloze": false,
            "cardTemplates": [{
                "Name": spec.template_name,
                "Front": spec.template.qfmt,
                "Back": spec.template.afmt,
            }]
        });
        if let Some(css) = &spec.template.css {
            params["css"] = json!(css);
        }

        self.invoke::<serde_json::Value>("createModel", params)
            .await?
            .into_result("createModel")?;
        Ok(())
    }

    /// Note ids matching an Anki search query
    pub async fn find_notes(&self, query: &str) -> Result<Vec<i64>, CollectionError> {
        self.invoke::<Vec<i64>>("findNotes", json!({ "query": query }))
            .await?
            .into_result("findNotes")
    }

    pub async fn delete_notes(&self, ids: &[i64]) -> Result<(), CollectionError> {
        self.invoke::<serde_json::Value>("deleteNotes", json!({ "notes": ids }))
            .await?
            .into_unit()
    }

    /// Add a note to Anki
    pub async fn add_note(&self, deck: &str, note: &NewNote) -> Result<i64, CollectionError> {
        let fields: serde_json::Map<String, serde_json::Value> = note
            .fields()
            .iter()
            .map(|f| (f.name.clone(), json!(f.value)))
            .collect();

        let params = json!({
            "note": {
                "deckName": deck,
                "modelName": note.model_name,
                "fields": fields,
                "options": {
                    "allowDuplicate": true
                },
                "tags": note.tags
            }
        });

        self.invoke::<i64>("addNote", params)
            .await?
            .into_result("addNote")
    }

    /// Absolute path of the collection's media folder
    pub async fn media_dir_path(&self) -> Result<String, CollectionError> {
        self.invoke::<String>("getMediaDirPath", json!({}))
            .await?
            .into_result("getMediaDirPath")
    }

    /// Store a file in the media folder, replacing any file with the same name
    pub async fn store_media_file(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<String, CollectionError> {
        let params = json!({
            "filename": filename,
            "data": STANDARD.encode(data),
            "deleteExisting": true
        });

        self.invoke::<String>("storeMediaFile", params)
            .await?
            .into_result("storeMediaFile")
    }

    /// Invoke an AnkiConnect API action
    async fn invoke<T>(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<AnkiResponse<T>, CollectionError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request = AnkiRequest {
            action: action.to_string(),
            version: API_VERSION,
            params,
        };

        tracing::debug!("AnkiConnect request: {}", action);

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?;

        Ok(response.json::<AnkiResponse<T>>().await?)
    }
}

#[derive(Serialize)]
struct AnkiRequest {
    action: String,
    version: u32,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self, action: &str) -> Result<T, CollectionError> {
        if let Some(error) = self.error {
            return Err(CollectionError::Backend(error));
        }

        self.result
            .ok_or_else(|| CollectionError::NullResult(action.to_string()))
    }

    /// For actions whose result is always null
    fn into_unit(self) -> Result<(), CollectionError> {
        match self.error {
            Some(error) => Err(CollectionError::Backend(error)),
            None => Ok(()),
        }
    }
}

#[derive(Deserialize)]
struct ModelStyling {
    css: String,
}
