//! `studentsim add`: Add or replace a knowledge component.

use crate::commands::{load_config, open_store};
use std::path::Path;
use studentsim_core::knowledge::KnowledgeComponent;

pub async fn run(
    config_path: &Path,
    id: String,
    name: String,
    keywords: Vec<String>,
    description: String,
    mastery: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let keywords: Vec<String> = keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    let component = KnowledgeComponent::new(id, name, keywords, description)?.with_mastery(mastery);

    let mut store = open_store(&config);
    let replacing = store.contains(component.id());
    println!(
        "✓ {} {} ({}% mastery, keywords: {})",
        if replacing { "Replaced" } else { "Added" },
        component.name(),
        component.mastery(),
        component.keywords().join(", ")
    );
    store.add_component(component);
    Ok(())
}
