//! End-to-end session tests: config → on-disk taxonomy and prompts →
//! scripted provider → history and persisted mastery.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use studentsim_agent::context::DEFAULT_PROMPT_FILES;
use studentsim_agent::{StudentSimulator, FALLBACK_REPLY};
use studentsim_config::AppConfig;
use studentsim_core::error::ProviderError;
use studentsim_core::knowledge::{KnowledgeComponent, KnowledgeDocument};
use studentsim_core::message::Message;
use studentsim_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use tempfile::TempDir;

/// Returns scripted replies in order; `None` entries fail the call.
struct ScriptedProvider {
    script: Mutex<Vec<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Option<&str>>) -> Self {
        let mut script: Vec<Option<String>> = script.into_iter().map(|s| s.map(String::from)).collect();
        script.reverse();
        Self {
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn system_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.prompts.lock().unwrap().push(request.messages[0].content.clone());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedProvider: script exhausted");
        match next {
            Some(text) => Ok(ProviderResponse {
                message: Message::assistant(text),
                usage: Some(Usage {
                    prompt_tokens: 100,
                    completion_tokens: 10,
                    total_tokens: 110,
                }),
                model: request.model,
            }),
            None => Err(ProviderError::RateLimited { retry_after_secs: 5 }),
        }
    }
}

fn workspace(dir: &Path) -> AppConfig {
    let prompts_dir = dir.join("prompts");
    std::fs::create_dir_all(&prompts_dir).unwrap();
    for (file, content) in DEFAULT_PROMPT_FILES {
        std::fs::write(prompts_dir.join(file), content).unwrap();
    }

    AppConfig {
        api_key: Some("sk-test".into()),
        data_dir: dir.join("data"),
        knowledge_file: dir.join("data").join("kc_mastery.json"),
        prompts_dir,
        ..AppConfig::default()
    }
}

fn read_document(path: &Path) -> KnowledgeDocument {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn first_run_writes_default_taxonomy() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path());
    let provider = Arc::new(ScriptedProvider::new(vec![]));

    let sim = StudentSimulator::from_config(&config, provider);
    assert_eq!(sim.mastery_status().len(), 8);

    let document = read_document(&config.knowledge_file);
    let ids: Vec<&str> = document.ids().collect();
    assert_eq!(ids[0], "basic_addition");
    assert_eq!(ids[7], "place_value");
}

#[tokio::test]
async fn conversation_flows_into_later_prompts() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path());
    let provider = Arc::new(ScriptedProvider::new(vec![Some("Um... 31?"), Some("Oh! 32!")]));
    let mut sim = StudentSimulator::from_config(&config, provider.clone());

    assert_eq!(sim.respond("What is 25 + 7?").await, "Um... 31?");
    assert_eq!(sim.respond("Try carrying the one.").await, "Oh! 32!");
    assert_eq!(sim.history().len(), 4);

    let prompts = provider.system_prompts();
    assert!(prompts[0].contains("This is the start of the conversation."));
    assert!(prompts[0].contains("- Addition with Carrying (two digit): 50% mastery"));
    assert!(prompts[1].contains("Teacher: What is 25 + 7?\nStudent: Um... 31?"));
}

#[tokio::test]
async fn failed_turn_leaves_history_untouched() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path());
    let provider = Arc::new(ScriptedProvider::new(vec![Some("Five"), None]));
    let mut sim = StudentSimulator::from_config(&config, provider);

    sim.respond("What is 2 plus 3?").await;
    assert_eq!(sim.history().len(), 2);

    assert_eq!(sim.respond("And 4 plus 4?").await, FALLBACK_REPLY);
    assert_eq!(sim.history().len(), 2);
}

#[tokio::test]
async fn mastery_changes_persist_across_sessions() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path());

    {
        let mut sim = StudentSimulator::from_config(&config, Arc::new(ScriptedProvider::new(vec![])));
        assert!(sim.update_mastery("borrowing_subtraction", 100));
        assert!(!sim.update_mastery("no_such_component", 100));
        sim.add_component(
            KnowledgeComponent::new(
                "fractions",
                "Fractions",
                vec!["fraction".into(), "half".into()],
                "Parts of a whole",
            )
            .unwrap(),
        );
    }

    let sim = StudentSimulator::from_config(&config, Arc::new(ScriptedProvider::new(vec![])));
    assert_eq!(sim.store().get_mastery("borrowing_subtraction"), 100);
    let last = sim.mastery_status().pop().unwrap();
    assert_eq!(last.id, "fractions");
    assert_eq!(last.mastery, 0);
}

#[tokio::test]
async fn unmatched_question_gets_no_guidance() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path());
    let provider = Arc::new(ScriptedProvider::new(vec![Some("Hi!")]));
    let mut sim = StudentSimulator::from_config(&config, provider.clone());

    sim.respond("Good morning, how was your weekend?").await;

    let prompt = &provider.system_prompts()[0];
    assert!(prompt.contains("No specific knowledge components identified for this question."));
    assert!(prompt.ends_with("\n\n"));
}
