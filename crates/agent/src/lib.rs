//! The simulated student session for studentsim.
//!
//! Each teacher message goes through one cycle:
//!
//! 1. **Match** the message against the knowledge taxonomy
//! 2. **Assemble** the system prompt (mastery summary, history, tier guidance)
//! 3. **Ask** the configured provider for the student's reply
//! 4. **Record** both lines in the bounded history
//!
//! A failed provider call ends the cycle early with a fixed fallback reply.

pub mod context;
pub mod simulator;

pub use context::{PromptAssembler, PromptTemplate, PromptTemplates};
pub use simulator::{MasteryStatus, StudentSimulator, FALLBACK_REPLY};
