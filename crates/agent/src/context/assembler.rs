//! System prompt assembly for one teacher turn.
//!
//! The prompt is built from three inputs, all rendered into the base
//! template, followed by the guidance fragment for the governing tier:
//!
//! 1. **Mastery summary** - one line per relevant component
//! 2. **Conversation history** - the most recent entries, chronological
//! 3. **Teacher message** - verbatim
//!
//! Assembly is deterministic: identical inputs always produce identical
//! outputs. No random or time-dependent logic is used.

use crate::context::template::{PromptTemplates, TemplateValues};
use studentsim_core::history::{ConversationHistory, HISTORY_RENDER_WINDOW};
use studentsim_core::knowledge::KnowledgeStore;
use studentsim_core::relevance::RelevancePair;
use studentsim_core::tier::resolve_tier;

/// Shown in place of the mastery summary when nothing matched.
pub const NO_COMPONENTS_MESSAGE: &str =
    "No specific knowledge components identified for this question.";

/// Shown in place of the history block before the first exchange.
pub const START_OF_CONVERSATION: &str = "This is the start of the conversation.";

/// The prompt assembler. Holds only the templates; create one and reuse it.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    templates: PromptTemplates,
}

impl PromptAssembler {
    pub fn new(templates: PromptTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    /// Build the system prompt for `teacher_message`.
    ///
    /// Output is always `base + "\n\n" + guidance`, even when either side
    /// is empty.
    pub fn assemble(
        &self,
        teacher_message: &str,
        pairs: &[RelevancePair],
        store: &KnowledgeStore,
        history: &ConversationHistory,
    ) -> String {
        let mastery_info = render_mastery_info(pairs, store);
        let conversation_history = render_history(history);

        let base = self.templates.base.render(&TemplateValues {
            conversation_history: &conversation_history,
            mastery_info: &mastery_info,
            teacher_message,
        });
        let guidance = self.templates.guidance(resolve_tier(pairs));

        format!("{base}\n\n{guidance}")
    }
}

/// `- <name>: <mastery>% mastery` per pair, or [`NO_COMPONENTS_MESSAGE`].
///
/// The mastery shown is the one captured in the pair. A pair whose id is no
/// longer in the store falls back to the id as its display name.
pub fn render_mastery_info(pairs: &[RelevancePair], store: &KnowledgeStore) -> String {
    if pairs.is_empty() {
        return NO_COMPONENTS_MESSAGE.to_string();
    }

    pairs
        .iter()
        .map(|pair| {
            let name = store
                .get(&pair.component_id)
                .map(|kc| kc.name())
                .unwrap_or(pair.component_id.as_str());
            format!("- {name}: {}% mastery", pair.mastery)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The last [`HISTORY_RENDER_WINDOW`] entries, one per line.
pub fn render_history(history: &ConversationHistory) -> String {
    if history.is_empty() {
        return START_OF_CONVERSATION.to_string();
    }

    history
        .recent(HISTORY_RENDER_WINDOW)
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::template::PromptTemplate;
    use studentsim_core::history::Speaker;
    use studentsim_core::knowledge::default_components;
    use studentsim_core::relevance::identify_relevant;
    use studentsim_memory::NoopPersistence;

    fn store() -> KnowledgeStore {
        KnowledgeStore::with_components(default_components(), Box::new(NoopPersistence))
    }

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(PromptTemplates {
            base: PromptTemplate::parse(
                "base",
                "KNOW:\n{mastery_info}\nHIST:\n{conversation_history}\nQ: {teacher_message}",
            )
            .unwrap(),
            mastery_0: "G0".into(),
            mastery_50: "G50".into(),
            mastery_100: "G100".into(),
        })
    }

    #[test]
    fn empty_relevance_uses_fallback_sentence_and_no_guidance() {
        let store = store();
        let prompt = assembler().assemble("Hello there", &[], &store, &ConversationHistory::new());
        assert!(prompt.contains(NO_COMPONENTS_MESSAGE));
        assert!(prompt.contains(START_OF_CONVERSATION));
        assert!(prompt.ends_with("Q: Hello there\n\n"));
    }

    #[test]
    fn mastery_lines_use_component_names() {
        let store = store();
        let pairs = identify_relevant("What is 25 + 7?", &store);
        let info = render_mastery_info(&pairs, &store);
        assert_eq!(
            info,
            "- Basic Addition (single digit): 100% mastery\n- Addition with Carrying (two digit): 50% mastery"
        );
    }

    #[test]
    fn lowest_mastery_selects_guidance() {
        let store = store();
        let pairs = identify_relevant("What is 25 + 7?", &store);
        let prompt = assembler().assemble("What is 25 + 7?", &pairs, &store, &ConversationHistory::new());
        assert!(prompt.ends_with("\n\nG50"));

        let pairs = identify_relevant("Can you borrow when you subtract?", &store);
        let prompt = assembler().assemble("Can you borrow when you subtract?", &pairs, &store, &ConversationHistory::new());
        assert!(prompt.ends_with("\n\nG0"));
    }

    #[test]
    fn history_renders_last_ten_entries() {
        let mut history = ConversationHistory::new();
        for i in 0..12 {
            history.append(Speaker::Teacher, format!("t{i}"));
            history.append(Speaker::Student, format!("s{i}"));
        }
        assert_eq!(history.len(), 20);

        let rendered = render_history(&history);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Teacher: t7");
        assert_eq!(lines[9], "Student: s11");
    }

    #[test]
    fn unknown_component_falls_back_to_id() {
        let store = store();
        let pairs = vec![RelevancePair::new("fractions", 0)];
        assert_eq!(render_mastery_info(&pairs, &store), "- fractions: 0% mastery");
    }

    #[test]
    fn empty_templates_still_join() {
        let assembler = PromptAssembler::new(PromptTemplates::default());
        let store = store();
        let prompt = assembler.assemble("add", &[RelevancePair::new("basic_addition", 100)], &store, &ConversationHistory::new());
        assert_eq!(prompt, "\n\n");
    }
}
