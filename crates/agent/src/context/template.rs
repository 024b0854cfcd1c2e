//! Prompt templates with a fixed, validated placeholder set.
//!
//! The base template may reference `{conversation_history}`,
//! `{mastery_info}` and `{teacher_message}`; `{{` and `}}` produce literal
//! braces. Anything else in braces is rejected when the template is parsed,
//! so rendering itself cannot fail.
//!
//! The three guidance fragments are plain text and are used verbatim.

use std::path::Path;
use studentsim_core::error::TemplateError;
use studentsim_core::tier::MasteryTier;
use tracing::{debug, warn};

pub const BASE_PROMPT_FILE: &str = "student_base_prompt.txt";
pub const MASTERY_0_PROMPT_FILE: &str = "mastery_0_prompt.txt";
pub const MASTERY_50_PROMPT_FILE: &str = "mastery_50_prompt.txt";
pub const MASTERY_100_PROMPT_FILE: &str = "mastery_100_prompt.txt";

/// Default contents for each prompt file, written by `studentsim init`.
pub const DEFAULT_PROMPT_FILES: [(&str, &str); 4] = [
    (BASE_PROMPT_FILE, include_str!("../../../../prompts/student_base_prompt.txt")),
    (MASTERY_0_PROMPT_FILE, include_str!("../../../../prompts/mastery_0_prompt.txt")),
    (MASTERY_50_PROMPT_FILE, include_str!("../../../../prompts/mastery_50_prompt.txt")),
    (MASTERY_100_PROMPT_FILE, include_str!("../../../../prompts/mastery_100_prompt.txt")),
];

/// A named slot the base template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    ConversationHistory,
    MasteryInfo,
    TeacherMessage,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "conversation_history" => Some(Self::ConversationHistory),
            "mastery_info" => Some(Self::MasteryInfo),
            "teacher_message" => Some(Self::TeacherMessage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Values substituted into the base template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateValues<'a> {
    pub conversation_history: &'a str,
    pub mastery_info: &'a str,
    pub teacher_message: &'a str,
}

impl TemplateValues<'_> {
    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::ConversationHistory => self.conversation_history,
            Placeholder::MasteryInfo => self.mastery_info,
            Placeholder::TeacherMessage => self.teacher_message,
        }
    }
}

/// A parsed base template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// The empty template; renders to an empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `source`, validating every placeholder. `name` only labels errors.
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(TemplateError::UnbalancedBrace {
                        template: name.to_string(),
                        offset,
                    });
                }
                '{' => {
                    let mut slot = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => break,
                            other => slot.push(other),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnbalancedBrace {
                            template: name.to_string(),
                            offset,
                        });
                    }
                    let placeholder = Placeholder::from_name(&slot).ok_or_else(|| {
                        TemplateError::UnknownPlaceholder {
                            template: name.to_string(),
                            name: slot.clone(),
                        }
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(placeholder));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Placeholders referenced by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, values: &TemplateValues<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(p) => out.push_str(values.get(*p)),
            }
        }
        out
    }
}

/// The base template plus one guidance fragment per mastery tier.
#[derive(Debug, Clone, Default)]
pub struct PromptTemplates {
    pub base: PromptTemplate,
    pub mastery_0: String,
    pub mastery_50: String,
    pub mastery_100: String,
}

impl PromptTemplates {
    /// Load all four files from `dir`.
    ///
    /// Never fails: a missing or unreadable file, or an invalid base
    /// template, is logged and replaced by an empty template.
    pub fn load(dir: &Path) -> Self {
        let base = match read_trimmed(dir, BASE_PROMPT_FILE)
            .and_then(|source| PromptTemplate::parse(BASE_PROMPT_FILE, &source))
        {
            Ok(template) => template,
            Err(e) => {
                warn!(error = %e, "Using empty base prompt");
                PromptTemplate::empty()
            }
        };

        let fragment = |file: &str| {
            read_trimmed(dir, file).unwrap_or_else(|e| {
                warn!(error = %e, "Using empty guidance prompt");
                String::new()
            })
        };

        let templates = Self {
            base,
            mastery_0: fragment(MASTERY_0_PROMPT_FILE),
            mastery_50: fragment(MASTERY_50_PROMPT_FILE),
            mastery_100: fragment(MASTERY_100_PROMPT_FILE),
        };
        debug!(dir = %dir.display(), "Prompt templates loaded");
        templates
    }

    /// The bundled default prompts, parsed in memory.
    pub fn defaults() -> Result<Self, TemplateError> {
        let [base, zero, fifty, hundred] = DEFAULT_PROMPT_FILES;
        Ok(Self {
            base: PromptTemplate::parse(base.0, base.1.trim())?,
            mastery_0: zero.1.trim().to_string(),
            mastery_50: fifty.1.trim().to_string(),
            mastery_100: hundred.1.trim().to_string(),
        })
    }

    /// Guidance for a tier; `None` yields an empty fragment.
    pub fn guidance(&self, tier: Option<MasteryTier>) -> &str {
        match tier {
            Some(MasteryTier::Zero) => &self.mastery_0,
            Some(MasteryTier::AtMostFifty) => &self.mastery_50,
            Some(MasteryTier::Hundred) => &self.mastery_100,
            None => "",
        }
    }
}

fn read_trimmed(dir: &Path, file: &str) -> Result<String, TemplateError> {
    let path = dir.join(file);
    std::fs::read_to_string(&path)
        .map(|content| content.trim().to_string())
        .map_err(|e| TemplateError::Missing(format!("{} ({e})", path.display())))
}
