//! `studentsim init`: Write default config and prompt files.

use std::path::Path;
use studentsim_agent::context::DEFAULT_PROMPT_FILES;
use studentsim_config::AppConfig;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🎓 studentsim — First-Time Setup");
    println!("================================\n");

    // Create config file
    if config_path.exists() {
        println!("  Config already exists at: {}", config_path.display());
    } else {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, AppConfig::default_toml())?;
        println!("✅ Created {}", config_path.display());
    }

    // The API key may not be set yet, so only the file layer is read here
    let config = AppConfig::load_from(config_path)?;
    config.ensure_dirs()?;
    println!("✅ Data directory: {}", config.data_dir.display());

    for (file, content) in DEFAULT_PROMPT_FILES {
        let path = config.prompts_dir.join(file);
        if path.exists() {
            println!("  Keeping existing {}", path.display());
        } else {
            std::fs::write(&path, content)?;
            println!("✅ Created {}", path.display());
        }
    }

    println!("\n📝 Next steps:");
    println!("   1. Set OPENAI_API_KEY (or add api_key to {})", config_path.display());
    println!("   2. Run: studentsim chat");
    println!("   3. Ask the student a question!\n");

    Ok(())
}
