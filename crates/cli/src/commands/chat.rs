//! `studentsim chat`: Interactive or single-message tutoring session.

use crate::commands::load_config;
use crate::repl::Repl;
use std::path::Path;
use studentsim_agent::StudentSimulator;
use tokio::io::{self, BufReader};
use tracing::info;

pub async fn run(config_path: &Path, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    // Check for API key early - give a clear error
    let provider = match studentsim_providers::build_from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!();
            eprintln!("  Configuration error: {e}");
            eprintln!("  Please make sure you have set the OPENAI_API_KEY environment variable,");
            eprintln!("  or add api_key to {}", config_path.display());
            eprintln!();
            return Err(e.into());
        }
    };

    config.ensure_dirs()?;
    println!("Initializing student simulator...");
    let mut sim = StudentSimulator::from_config(&config, provider);
    info!(model = sim.model(), components = sim.store().len(), "Session ready");

    if let Some(msg) = message {
        // Single message mode
        let reply = sim.respond(&msg).await;
        println!("Student: {reply}");
        return Ok(());
    }

    let mut repl = Repl::new(BufReader::new(io::stdin()), std::io::stdout());
    tokio::select! {
        result = repl.run(&mut sim) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nInterrupted by user. Goodbye!");
            // A pending stdin read would otherwise hold the runtime open
            std::process::exit(0);
        }
    }

    Ok(())
}
