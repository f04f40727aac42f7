#![forbid(unsafe_code)]

pub mod file_store;
pub mod repository;
pub mod sqlite;

pub use file_store::FileKeyValueStore;
pub use repository::{
    InMemoryKeyValueStore, InMemoryRepository, KeyValueStore, Storage, StorageError,
    StudyEngineRow, StudyEngineRowRepository,
};
