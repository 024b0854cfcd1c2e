//! File-based backend: the taxonomy as one pretty-printed JSON document.
//!
//! Storage location defaults to `data/kc_mastery.json` relative to the
//! working directory. The document is a JSON object keyed by component id:
//!
//! ```json
//! {
//!   "basic_addition": {
//!     "name": "Basic Addition (single digit)",
//!     "mastery": 100,
//!     "keywords": ["add", "plus", "+", "sum"],
//!     "description": "Adding single digit numbers"
//!   }
//! }
//! ```
//!
//! Every persist rewrites the whole file; nothing is appended.

use std::path::{Path, PathBuf};
use studentsim_core::error::PersistenceError;
use studentsim_core::knowledge::{KnowledgeDocument, KnowledgePersistence};
use tracing::debug;

/// A JSON file holding the knowledge component document.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default path: `data/kc_mastery.json`
    pub fn default_path() -> PathBuf {
        PathBuf::from("data").join("kc_mastery.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KnowledgePersistence for JsonFileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self) -> Result<Option<KnowledgeDocument>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| PersistenceError::Read {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let document: KnowledgeDocument =
            serde_json::from_str(&content).map_err(|e| PersistenceError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), count = document.len(), "Knowledge document read");
        Ok(Some(document))
    }

    fn persist(&self, document: &KnowledgeDocument) -> Result<(), PersistenceError> {
        let write_error = |reason: String| PersistenceError::Write {
            path: self.path.clone(),
            reason,
        };

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_error(format!("Failed to create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| write_error(format!("Failed to serialize document: {e}")))?;

        std::fs::write(&self.path, content).map_err(|e| write_error(e.to_string()))?;

        debug!(path = %self.path.display(), count = document.len(), "Knowledge document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use studentsim_core::knowledge::{KnowledgeComponent, KnowledgeStore};
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("kc.json"));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn store_creates_file_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("kc_mastery.json");

        let store = KnowledgeStore::load(Box::new(JsonFileBackend::new(&path)));
        assert_eq!(store.len(), 8);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"basic_addition\""));
        assert!(content.contains("  \"carry_addition\": {"));
    }

    #[test]
    fn mutations_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kc.json");

        {
            let mut store = KnowledgeStore::load(Box::new(JsonFileBackend::new(&path)));
            store.update_mastery("basic_division", 100);
            store.add_component(
                KnowledgeComponent::new("fractions", "Fractions", vec!["fraction".into()], "Parts of a whole")
                    .unwrap()
                    .with_mastery(50),
            );
        }

        let store = KnowledgeStore::load(Box::new(JsonFileBackend::new(&path)));
        assert_eq!(store.get_mastery("basic_division"), 100);
        assert_eq!(store.get_mastery("fractions"), 50);
        assert_eq!(store.all_components().last().unwrap().id(), "fractions");
    }

    #[test]
    fn corrupted_file_is_parse_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "this is not json").unwrap();
        let backend = JsonFileBackend::new(tmp.path());
        assert!(matches!(backend.load(), Err(PersistenceError::Parse { .. })));
    }

    #[test]
    fn corrupted_file_falls_back_to_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "{{ truncated").unwrap();
        let store = KnowledgeStore::load(Box::new(JsonFileBackend::new(tmp.path())));
        assert_eq!(store.len(), 8);
        assert_eq!(store.get_mastery("basic_addition"), 100);
    }

    #[test]
    fn reads_hand_written_document() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{"ratios": {{"name": "Ratios", "mastery": 0, "keywords": ["ratio"], "description": "a:b"}}}}"#
        )
        .unwrap();
        let store = KnowledgeStore::load(Box::new(JsonFileBackend::new(tmp.path())));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ratios").unwrap().description(), "a:b");
    }

    #[test]
    fn write_into_unwritable_location_fails() {
        let tmp = NamedTempFile::new().unwrap();
        // A regular file cannot be a parent directory
        let backend = JsonFileBackend::new(tmp.path().join("kc.json"));
        let result = backend.persist(&KnowledgeDocument::new());
        assert!(matches!(result, Err(PersistenceError::Write { .. })));
    }
}
