//! Relevance matching: which knowledge components does a teacher turn touch?
//!
//! Matching is deliberately shallow: case-insensitive keyword substrings,
//! plus one numeric heuristic that spots multi-digit addition even when the
//! teacher never says "carry".

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::knowledge::KnowledgeStore;

/// Component emitted by the multi-digit addition heuristic.
pub const CARRY_ADDITION_ID: &str = "carry_addition";

/// A component touched by one input text, with its mastery at match time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelevancePair {
    pub component_id: String,
    pub mastery: u8,
}

impl RelevancePair {
    pub fn new(component_id: impl Into<String>, mastery: u8) -> Self {
        Self {
            component_id: component_id.into(),
            mastery,
        }
    }
}

/// Find the components relevant to `text`, in store insertion order.
///
/// Each component is emitted at most once for keyword hits. The carry
/// heuristic then appends `carry_addition` when the text holds at least two
/// numbers, a `+`, and some number above 9, unless an identical pair is
/// already present.
pub fn identify_relevant(text: &str, store: &KnowledgeStore) -> Vec<RelevancePair> {
    let lowered = text.to_lowercase();

    let mut pairs: Vec<RelevancePair> = store
        .all_components()
        .iter()
        .filter(|c| c.keywords().iter().any(|k| lowered.contains(k.as_str())))
        .map(|c| RelevancePair::new(c.id(), c.mastery()))
        .collect();

    if looks_like_carry_addition(text) {
        if let Some(carry) = store.get(CARRY_ADDITION_ID) {
            let pair = RelevancePair::new(carry.id(), carry.mastery());
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
    }

    trace!(count = pairs.len(), "Relevance matched");
    pairs
}

fn looks_like_carry_addition(text: &str) -> bool {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let numbers = numeric_tokens(text);
    numbers.len() >= 2 && text.contains('+') && numbers.iter().any(|&n| n > 9)
}

/// Whitespace-delimited tokens that are purely ASCII digits once surrounding
/// punctuation is stripped ("7?" counts, "3x" does not). Values too large for
/// `u64` saturate.
fn numeric_tokens(text: &str) -> Vec<u64> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        .map(|token| token.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}
