//! No-op backend: the taxonomy lives only for the current process.

use studentsim_core::error::PersistenceError;
use studentsim_core::knowledge::{KnowledgeDocument, KnowledgePersistence};

/// A backend that never has a saved document and discards writes.
pub struct NoopPersistence;

impl KnowledgePersistence for NoopPersistence {
    fn name(&self) -> &str { "none" }

    fn load(&self) -> Result<Option<KnowledgeDocument>, PersistenceError> {
        Ok(None)
    }

    fn persist(&self, _document: &KnowledgeDocument) -> Result<(), PersistenceError> {
        Ok(())
    }
}
