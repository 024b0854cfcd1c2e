//! `studentsim doctor`: Diagnose configuration, prompts, and data.

use std::path::Path;
use studentsim_agent::context::{PromptTemplate, DEFAULT_PROMPT_FILES};
use studentsim_agent::context::template::BASE_PROMPT_FILE;
use studentsim_config::AppConfig;
use studentsim_core::knowledge::KnowledgePersistence;
use studentsim_core::provider::Provider;
use studentsim_memory::JsonFileBackend;

pub async fn run(config_path: &Path, online: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 studentsim Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    // Check config
    if !config_path.exists() {
        println!("  ⚠️  No config file at {} — defaults in use (`studentsim init` writes one)", config_path.display());
    }
    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid (model {}, provider {})", config.model, config.provider);
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    // Check API key
    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ❌ No API key — set OPENAI_API_KEY or api_key in the config file");
        issues += 1;
    }

    // Check prompt templates
    for (file, _) in DEFAULT_PROMPT_FILES {
        let path = config.prompts_dir.join(file);
        match std::fs::read_to_string(&path) {
            Ok(content) if file == BASE_PROMPT_FILE => match PromptTemplate::parse(file, content.trim()) {
                Ok(_) => println!("  ✅ {}", path.display()),
                Err(e) => {
                    println!("  ❌ {}: {e}", path.display());
                    issues += 1;
                }
            },
            Ok(_) => println!("  ✅ {}", path.display()),
            Err(_) => {
                println!("  ⚠️  Missing {} — run `studentsim init`", path.display());
                issues += 1;
            }
        }
    }

    // Check knowledge file
    let backend = JsonFileBackend::new(&config.knowledge_file);
    match backend.load() {
        Ok(Some(document)) => match document.into_components() {
            Ok(components) => println!("  ✅ Knowledge file: {} components", components.len()),
            Err(e) => {
                println!("  ❌ Knowledge file invalid: {e}");
                issues += 1;
            }
        },
        Ok(None) => println!("  ⚠️  No knowledge file yet — defaults will be written on first run"),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    // Check provider endpoint
    if online {
        match studentsim_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider {} reachable", provider.name()),
                Ok(false) => {
                    println!("  ❌ Provider {} rejected the health check", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Provider not configured: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
