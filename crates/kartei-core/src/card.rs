use kartei_provider::AudioProvider;

use crate::template::CardTemplate;

/// A flashcard that can be persisted as a note with an optional audio asset.
///
/// One implementation per card kind. The field-name set, model name and
/// template are fixed per kind; only field values vary per instance.
pub trait AudioCard: Send + Sync {
    /// Name of the schema (note type) this kind is stored under
    fn model_name(&self) -> &str;

    /// Name of the single card template inside the schema
    fn template_name(&self) -> &str;

    /// Dedup key: `(field name, field value)`
    fn unique_id(&self) -> UniqueId;

    /// A card is valid iff its identity value is non-empty
    fn is_valid(&self) -> bool {
        !self.unique_id().value.is_empty()
    }

    /// Field values in schema column order
    fn fields(&self) -> CardFields;

    fn template(&self) -> &CardTemplate;

    fn audio_data(&self) -> Option<&[u8]>;

    /// Empty when the card carries no audio
    fn audio_filename(&self) -> &str;

    fn state(&self) -> CardState;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueId {
    pub field: String,
    pub value: String,
}

impl UniqueId {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Ordered field name → value mapping. Insertion order is column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    entries: Vec<(String, String)>,
}

impl CardFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, or replace its value in place if already present
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CardFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = CardFields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// Card creation progress.
///
/// `Unpopulated → VocabFetched → Ready`, or `→ ReadyNoAudio` when audio
/// synthesis was skipped on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Unpopulated,
    VocabFetched,
    Ready,
    ReadyNoAudio,
}

impl CardState {
    pub fn is_ready(self) -> bool {
        matches!(self, CardState::Ready | CardState::ReadyNoAudio)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardState::Unpopulated => "unpopulated",
            CardState::VocabFetched => "vocab fetched",
            CardState::Ready => "ready",
            CardState::ReadyNoAudio => "ready (no audio)",
        }
    }
}

/// How a card factory obtains audio
#[derive(Clone, Copy)]
pub enum AudioSource<'a> {
    Provider(&'a dyn AudioProvider),
    /// Explicit opt-out: the card ends in `ReadyNoAudio`
    Skip,
}

/// Field value embedding an audio file, empty when there is none
pub fn sound_tag(filename: &str) -> String {
    if filename.is_empty() {
        String::new()
    } else {
        format!("[sound:{filename}]")
    }
}
