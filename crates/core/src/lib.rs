//! # studentsim Core
//!
//! Domain types, traits, and error definitions for the studentsim
//! tutor-training simulator. This crate has **no I/O of its own**: the
//! knowledge store talks to disk through [`KnowledgePersistence`] and the
//! simulator talks to an LLM through [`Provider`], both implemented in
//! sibling crates.
//!
//! The engine itself lives here:
//! - [`knowledge`]: the ordered knowledge-component taxonomy and its store
//! - [`relevance`]: keyword and numeric matching of teacher text to components
//! - [`tier`]: reduction of matched components to one governing mastery tier
//! - [`history`]: the bounded conversation buffer

pub mod error;
pub mod message;
pub mod provider;
pub mod knowledge;
pub mod relevance;
pub mod tier;
pub mod history;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use knowledge::{KnowledgeComponent, KnowledgeDocument, KnowledgePersistence, KnowledgeStore};
pub use relevance::{identify_relevant, RelevancePair};
pub use tier::{resolve_tier, MasteryTier};
pub use history::{ConversationEntry, ConversationHistory, Speaker};
