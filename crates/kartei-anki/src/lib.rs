mod client;
mod collection;
mod connect;
mod error;
mod memory;
mod schema;
mod service;

pub use client::AnkiConnectClient;
pub use collection::{Collection, CollectionHandle};
pub use connect::AnkiConnectCollection;
pub use error::{CollectionError, MediaWriteError, SaveError};
pub use memory::{MemoryCollection, StoredNote};
pub use schema::{
    ModelId, NOTE_TAG, NamedTemplate, NewNote, NoteField, NoteId, NoteSchema, SchemaSpec,
};
pub use service::CardService;
