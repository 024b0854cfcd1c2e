//! One module per subcommand.

pub mod add;
pub mod chat;
pub mod doctor;
pub mod init;
pub mod set;
pub mod status;

use std::path::Path;
use studentsim_config::AppConfig;
use studentsim_core::knowledge::KnowledgeStore;
use studentsim_memory::JsonFileBackend;

/// Load config, reporting the path on failure.
pub fn load_config(path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Open the knowledge store named by the config.
pub fn open_store(config: &AppConfig) -> KnowledgeStore {
    KnowledgeStore::load(Box::new(JsonFileBackend::new(&config.knowledge_file)))
}
