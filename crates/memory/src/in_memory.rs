//! In-memory backend: useful for testing and ephemeral sessions.

use std::sync::{Arc, Mutex};
use studentsim_core::error::PersistenceError;
use studentsim_core::knowledge::{KnowledgeDocument, KnowledgePersistence};

/// Holds the last persisted document behind a shared handle.
///
/// Clones share the same slot, so a test can keep one clone and inspect
/// what the store wrote through the other.
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    document: Arc<Mutex<Option<KnowledgeDocument>>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-saved document.
    pub fn with_document(document: KnowledgeDocument) -> Self {
        let backend = Self::new();
        *backend.lock_document() = Some(document);
        backend
    }

    /// The most recently persisted document, if any.
    pub fn snapshot(&self) -> Option<KnowledgeDocument> {
        self.lock_document().clone()
    }

    /// Number of successful `persist` calls.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_document(&self) -> std::sync::MutexGuard<'_, Option<KnowledgeDocument>> {
        self.document.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KnowledgePersistence for InMemoryPersistence {
    fn name(&self) -> &str { "in_memory" }

    fn load(&self) -> Result<Option<KnowledgeDocument>, PersistenceError> {
        Ok(self.snapshot())
    }

    fn persist(&self, document: &KnowledgeDocument) -> Result<(), PersistenceError> {
        *self.lock_document() = Some(document.clone());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
