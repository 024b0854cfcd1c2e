//! Prompt construction for a single teacher turn.
//!
//! | Part | Source | Fallback |
//! |------|--------|----------|
//! | Base template | `student_base_prompt.txt` | Empty template |
//! | Mastery summary | Relevant components | Fixed sentence |
//! | History | Last ten entries | Fixed sentence |
//! | Guidance | Tier fragment | Empty string |

pub mod assembler;
pub mod template;

pub use assembler::{render_history, render_mastery_info, PromptAssembler};
pub use template::{Placeholder, PromptTemplate, PromptTemplates, TemplateValues, DEFAULT_PROMPT_FILES};
