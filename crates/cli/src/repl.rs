//! The interactive tutoring loop.
//!
//! Reads one line at a time; `/`-prefixed lines are session commands,
//! everything else is a teacher turn sent to the simulator. Generic over the
//! reader and writer so the loop can be driven from tests.

use crate::commands::status::render_status;
use std::io::Write;
use studentsim_agent::StudentSimulator;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

const RULE: &str = "============================================================";

/// What one input line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Empty,
    Help,
    Status,
    Update,
    Reset,
    Quit,
    Unknown,
    Teacher(&'a str),
}

/// Commands match case-insensitively; other text is passed on trimmed.
pub fn parse(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    if !line.starts_with('/') {
        return ReplCommand::Teacher(line);
    }

    match line.to_lowercase().as_str() {
        "/help" => ReplCommand::Help,
        "/status" => ReplCommand::Status,
        "/update" => ReplCommand::Update,
        "/reset" => ReplCommand::Reset,
        "/quit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown,
    }
}

pub fn welcome() -> String {
    [
        RULE,
        "STUDENT-TUTOR SIMULATOR",
        RULE,
        "This system simulates a student with varying knowledge mastery.",
        "You are the teacher/tutor, and the AI will respond as a student.",
        "",
        "Commands:",
        "  /help     - Show this help message",
        "  /status   - Show current knowledge mastery levels",
        "  /update   - Update a knowledge component mastery",
        "  /reset    - Reset conversation history",
        "  /quit     - Exit the program",
        "",
        "Start by asking the student a question!",
        RULE,
    ]
    .join("\n")
}

pub struct Repl<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    /// Run until `/quit` or end of input.
    pub async fn run(&mut self, sim: &mut StudentSimulator) -> std::io::Result<()> {
        writeln!(self.out, "{}", welcome())?;

        loop {
            write!(self.out, "\nTeacher: ")?;
            self.out.flush()?;

            let Some(line) = self.lines.next_line().await? else {
                writeln!(self.out, "\nGoodbye!")?;
                return Ok(());
            };

            match parse(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Help => writeln!(self.out, "{}", welcome())?,
                ReplCommand::Status => write!(self.out, "{}", render_status(&sim.mastery_status()))?,
                ReplCommand::Update => self.update(sim).await?,
                ReplCommand::Reset => {
                    sim.reset_conversation();
                    writeln!(self.out, "✓ Conversation history reset")?;
                }
                ReplCommand::Quit => {
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(());
                }
                ReplCommand::Unknown => {
                    writeln!(self.out, "Unknown command. Type /help for available commands.")?
                }
                ReplCommand::Teacher(text) => {
                    write!(self.out, "Student: ")?;
                    self.out.flush()?;
                    let reply = sim.respond(text).await;
                    writeln!(self.out, "{reply}")?;
                }
            }
        }
    }

    /// The numbered `/update` dialogue. End of input cancels it.
    async fn update(&mut self, sim: &mut StudentSimulator) -> std::io::Result<()> {
        let components = sim.mastery_status();

        writeln!(self.out, "\nAVAILABLE KNOWLEDGE COMPONENTS:")?;
        for (i, kc) in components.iter().enumerate() {
            writeln!(self.out, "{}. {} (currently {}%)", i + 1, kc.name, kc.mastery)?;
        }

        write!(self.out, "\nEnter the number of the KC to update (or 'cancel'): ")?;
        self.out.flush()?;
        let Some(choice) = self.lines.next_line().await? else {
            return Ok(());
        };
        let choice = choice.trim();
        if choice.eq_ignore_ascii_case("cancel") {
            return Ok(());
        }

        let Ok(number) = choice.parse::<i64>() else {
            writeln!(self.out, "Invalid input. Please enter a number.")?;
            return Ok(());
        };
        let Some(kc) = number
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| components.get(index))
        else {
            writeln!(self.out, "Invalid selection.")?;
            return Ok(());
        };

        write!(self.out, "Enter new mastery level for '{}' (0, 50, or 100): ", kc.name)?;
        self.out.flush()?;
        let Some(level) = self.lines.next_line().await? else {
            return Ok(());
        };
        let mastery = match level.trim() {
            "0" => 0,
            "50" => 50,
            "100" => 100,
            _ => {
                writeln!(self.out, "Invalid mastery level. Use 0, 50, or 100.")?;
                return Ok(());
            }
        };

        match sim.set_mastery(&kc.id, mastery) {
            Ok(stored) => writeln!(self.out, "✓ Updated {} to {stored}% mastery", kc.name)?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use studentsim_agent::{PromptAssembler, PromptTemplates, FALLBACK_REPLY};
    use studentsim_core::error::ProviderError;
    use studentsim_core::knowledge::{default_components, KnowledgeStore};
    use studentsim_core::message::Message;
    use studentsim_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use studentsim_memory::InMemoryPersistence;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(ProviderResponse {
                message: Message::assistant(format!("you said {last}")),
                usage: None,
                model: request.model,
            })
        }
    }

    struct DownProvider;

    #[async_trait]
    impl Provider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Timeout("120s".into()))
        }
    }

    fn simulator(provider: Arc<dyn Provider>) -> StudentSimulator {
        let store = KnowledgeStore::with_components(default_components(), Box::new(InMemoryPersistence::new()));
        StudentSimulator::new(provider, "test-model", store, PromptAssembler::new(PromptTemplates::default()))
    }

    async fn drive(sim: &mut StudentSimulator, input: &str) -> String {
        let mut repl = Repl::new(input.as_bytes(), Vec::new());
        repl.run(sim).await.unwrap();
        String::from_utf8(repl.into_output()).unwrap()
    }

    #[test]
    fn parse_commands_case_insensitively() {
        assert_eq!(parse("/QUIT"), ReplCommand::Quit);
        assert_eq!(parse("  /Status "), ReplCommand::Status);
        assert_eq!(parse("/frobnicate"), ReplCommand::Unknown);
        assert_eq!(parse("   "), ReplCommand::Empty);
        assert_eq!(parse(" What is 3 + 4? "), ReplCommand::Teacher("What is 3 + 4?"));
    }

    #[tokio::test]
    async fn teacher_turn_prints_reply() {
        let mut sim = simulator(Arc::new(EchoProvider));
        let out = drive(&mut sim, "What is 3 + 4?\n/quit\n").await;
        assert!(out.contains("Student: you said What is 3 + 4?"));
        assert!(out.trim_end().ends_with("Goodbye!"));
        assert_eq!(sim.history().len(), 2);
    }

    #[tokio::test]
    async fn failed_turn_prints_fallback() {
        let mut sim = simulator(Arc::new(DownProvider));
        let out = drive(&mut sim, "hello\n").await;
        assert!(out.contains(FALLBACK_REPLY));
        assert!(sim.history().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_and_reset() {
        let mut sim = simulator(Arc::new(EchoProvider));
        let out = drive(&mut sim, "hi\n/dance\n/reset\n").await;
        assert!(out.contains("Unknown command. Type /help for available commands."));
        assert!(out.contains("✓ Conversation history reset"));
        assert!(sim.history().is_empty());
    }

    #[tokio::test]
    async fn update_dialogue_sets_mastery() {
        let mut sim = simulator(Arc::new(EchoProvider));
        let out = drive(&mut sim, "/update\n4\n100\n").await;
        assert!(out.contains("4. Subtraction with Borrowing (currently 0%)"));
        assert!(out.contains("✓ Updated Subtraction with Borrowing to 100% mastery"));
        assert_eq!(sim.store().get_mastery("borrowing_subtraction"), 100);
    }

    #[tokio::test]
    async fn update_dialogue_rejects_bad_input() {
        let mut sim = simulator(Arc::new(EchoProvider));
        let out = drive(&mut sim, "/update\nnine\n/update\n0\n/update\n2\n75\n/update\nCANCEL\n").await;
        assert!(out.contains("Invalid input. Please enter a number."));
        assert!(out.contains("Invalid selection."));
        assert!(out.contains("Invalid mastery level. Use 0, 50, or 100."));
        assert_eq!(sim.store().get_mastery("carry_addition"), 50);
    }

    #[tokio::test]
    async fn status_lists_every_component() {
        let mut sim = simulator(Arc::new(EchoProvider));
        let out = drive(&mut sim, "/status\n").await;
        assert!(out.contains("✓ Basic Addition (single digit): 100%"));
        assert!(out.contains("~ Addition with Carrying (two digit): 50%"));
        assert!(out.contains("✗ Long Multiplication: 0%"));
    }
}
