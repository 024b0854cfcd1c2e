//! The simulated student session.
//!
//! One teacher turn runs: relevance matching → prompt assembly → a single
//! completion call → history update. Turns are strictly sequential; the
//! session owns its store and history and is driven from one task.

use crate::context::{PromptAssembler, PromptTemplates};
use std::sync::Arc;
use studentsim_config::AppConfig;
use studentsim_core::error::KnowledgeError;
use studentsim_core::history::{ConversationHistory, Speaker};
use studentsim_core::knowledge::{KnowledgeComponent, KnowledgeStore};
use studentsim_core::message::Message;
use studentsim_core::provider::{Provider, ProviderRequest};
use studentsim_core::relevance::identify_relevant;
use studentsim_memory::JsonFileBackend;
use tracing::{debug, info, warn};

/// Returned to the teacher when the completion call fails.
pub const FALLBACK_REPLY: &str = "I'm having trouble thinking right now. Could you repeat that?";

/// One row of the mastery table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasteryStatus {
    pub id: String,
    pub name: String,
    pub mastery: u8,
}

/// A tutoring session with one simulated student.
pub struct StudentSimulator {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per reply
    max_tokens: Option<u32>,

    store: KnowledgeStore,
    history: ConversationHistory,
    assembler: PromptAssembler,
}

impl StudentSimulator {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        store: KnowledgeStore,
        assembler: PromptAssembler,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            store,
            history: ConversationHistory::new(),
            assembler,
        }
    }

    /// Build a session from configuration: the knowledge file and prompts
    /// directory it names, and its sampling settings.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Self {
        let store = KnowledgeStore::load(Box::new(JsonFileBackend::new(&config.knowledge_file)));
        let assembler = PromptAssembler::new(PromptTemplates::load(&config.prompts_dir));

        Self::new(provider, config.model.clone(), store, assembler)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per student reply.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Produce the student's reply to one teacher message.
    ///
    /// On success the trimmed reply is returned and both lines are appended
    /// to the history. On provider failure the error is logged, the history
    /// is left untouched and [`FALLBACK_REPLY`] is returned.
    pub async fn respond(&mut self, teacher_message: &str) -> String {
        let pairs = identify_relevant(teacher_message, &self.store);
        debug!(matched = pairs.len(), "Relevant components identified");

        let system_prompt = self
            .assembler
            .assemble(teacher_message, &pairs, &self.store, &self.history);

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(teacher_message)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.provider.complete(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    info!(
                        provider = self.provider.name(),
                        model = %response.model,
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Student reply received"
                    );
                }
                let reply = response.message.content.trim().to_string();
                self.history.append(Speaker::Teacher, teacher_message);
                self.history.append(Speaker::Student, reply.clone());
                reply
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Error generating response");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Set mastery for `id`, clamped to 0..=100. Unknown ids are ignored.
    pub fn update_mastery(&mut self, id: &str, mastery: i64) -> bool {
        self.store.update_mastery(id, mastery)
    }

    /// Like [`update_mastery`](Self::update_mastery) but reports unknown ids.
    ///
    /// Returns the value actually stored.
    pub fn set_mastery(&mut self, id: &str, mastery: i64) -> Result<u8, KnowledgeError> {
        if !self.store.update_mastery(id, mastery) {
            return Err(KnowledgeError::UnknownComponent(id.to_string()));
        }
        Ok(self.store.get_mastery(id))
    }

    pub fn add_component(&mut self, component: KnowledgeComponent) {
        info!(id = component.id(), mastery = component.mastery(), "Knowledge component added");
        self.store.add_component(component);
    }

    /// Every component in insertion order.
    pub fn mastery_status(&self) -> Vec<MasteryStatus> {
        self.store
            .all_components()
            .iter()
            .map(|kc| MasteryStatus {
                id: kc.id().to_string(),
                name: kc.name().to_string(),
                mastery: kc.mastery(),
            })
            .collect()
    }

    pub fn reset_conversation(&mut self) {
        self.history.clear();
        debug!("Conversation history cleared");
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
