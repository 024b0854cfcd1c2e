//! `studentsim set`: Change one component's mastery without a session.

use crate::commands::{load_config, open_store};
use std::path::Path;
use studentsim_core::error::KnowledgeError;

pub async fn run(config_path: &Path, id: &str, mastery: i64) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config);

    if !store.update_mastery(id, mastery) {
        return Err(KnowledgeError::UnknownComponent(id.to_string()).into());
    }

    let name = store.get(id).map(|kc| kc.name().to_string()).unwrap_or_default();
    println!("✓ Updated {name} to {}% mastery", store.get_mastery(id));
    Ok(())
}
