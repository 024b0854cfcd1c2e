//! `studentsim status`: Show the mastery table.

use crate::commands::{load_config, open_store};
use std::path::Path;
use studentsim_agent::MasteryStatus;

const DIVIDER: &str = "----------------------------------------";

fn icon(mastery: u8) -> char {
    match mastery {
        100 => '✓',
        50 => '~',
        _ => '✗',
    }
}

/// The mastery table, one line per component in insertion order.
pub fn render_status(status: &[MasteryStatus]) -> String {
    let mut out = format!("\nCURRENT KNOWLEDGE MASTERY LEVELS:\n{DIVIDER}\n");
    for kc in status {
        out.push_str(&format!("{} {}: {}%\n", icon(kc.mastery), kc.name, kc.mastery));
    }
    out.push_str(DIVIDER);
    out.push('\n');
    out
}

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let store = open_store(&config);

    let status: Vec<MasteryStatus> = store
        .all_components()
        .iter()
        .map(|kc| MasteryStatus {
            id: kc.id().to_string(),
            name: kc.name().to_string(),
            mastery: kc.mastery(),
        })
        .collect();

    print!("{}", render_status(&status));
    println!("  Knowledge file: {}", config.knowledge_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, mastery: u8) -> MasteryStatus {
        MasteryStatus {
            id: name.to_lowercase(),
            name: name.into(),
            mastery,
        }
    }

    #[test]
    fn icons_follow_mastery() {
        let table = render_status(&[row("Full", 100), row("Half", 50), row("Odd", 37), row("None", 0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "CURRENT KNOWLEDGE MASTERY LEVELS:");
        assert_eq!(lines[3], "✓ Full: 100%");
        assert_eq!(lines[4], "~ Half: 50%");
        assert_eq!(lines[5], "✗ Odd: 37%");
        assert_eq!(lines[6], "✗ None: 0%");
        assert_eq!(lines[7], DIVIDER);
    }
}
