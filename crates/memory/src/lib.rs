//! Persistence backends for the studentsim knowledge store.
//!
//! All backends implement `studentsim_core::KnowledgePersistence`.

pub mod noop;
pub mod in_memory;
pub mod file_backend;

pub use noop::NoopPersistence;
pub use in_memory::InMemoryPersistence;
pub use file_backend::JsonFileBackend;
