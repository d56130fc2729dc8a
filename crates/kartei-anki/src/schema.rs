use kartei_core::{AudioCard, CardTemplate};
use serde::{Deserialize, Serialize};

pub type ModelId = i64;
pub type NoteId = i64;

/// Tag attached to every note this crate creates
pub const NOTE_TAG: &str = "kartei";

/// A note type as stored in the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSchema {
    pub id: ModelId,
    pub name: String,
    /// Field names in column order
    pub fields: Vec<String>,
    pub templates: Vec<NamedTemplate>,
    pub css: Option<String>,
}

impl NoteSchema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Blank note of this schema, one empty value per field
    pub fn new_note(&self) -> NewNote {
        NewNote {
            model_name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|name| NoteField {
                    name: name.clone(),
                    value: String::new(),
                })
                .collect(),
            tags: vec![NOTE_TAG.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTemplate {
    pub name: String,
    pub qfmt: String,
    pub afmt: String,
}

/// Everything needed to create a schema for a card kind
#[derive(Debug, Clone)]
pub struct SchemaSpec {
    pub name: String,
    pub fields: Vec<String>,
    pub template_name: String,
    pub template: CardTemplate,
}

impl SchemaSpec {
    pub fn from_card(card: &dyn AudioCard) -> Self {
        Self {
            name: card.model_name().to_string(),
            fields: card.fields().names().map(str::to_string).collect(),
            template_name: card.template_name().to_string(),
            template: card.template().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteField {
    pub name: String,
    pub value: String,
}

/// A note that has not been added to the collection yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub model_name: String,
    fields: Vec<NoteField>,
    pub tags: Vec<String>,
}

impl NewNote {
    /// Set a field value. Returns false if the schema has no such field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn fields(&self) -> &[NoteField] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> NoteSchema {
        NoteSchema {
            id: 1,
            name: "Vocab".to_string(),
            fields: vec!["id".to_string(), "term".to_string()],
            templates: vec![],
            css: None,
        }
    }

    #[test]
    fn test_new_note_from_schema() {
        let mut note = schema().new_note();

        assert_eq!(note.model_name, "Vocab");
        assert_eq!(note.fields().len(), 2);
        assert_eq!(note.get("term"), Some(""));
        assert_eq!(note.tags, vec![NOTE_TAG.to_string()]);

        assert!(note.set("term", "Haus"));
        assert!(!note.set("unknown", "x"));
        assert_eq!(note.get("term"), Some("Haus"));
    }
}
