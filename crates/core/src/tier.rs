//! Mastery tiers: the coarse competence bucket that picks guidance text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::relevance::RelevancePair;

/// Governing competence for one teacher turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryTier {
    /// The student has not learned the weakest touched skill at all.
    Zero,
    /// Partial understanding (any mastery from 1 to 50).
    AtMostFifty,
    /// Full mastery of every touched skill.
    Hundred,
}

impl MasteryTier {
    /// Bucket a single mastery value.
    pub fn from_mastery(mastery: u8) -> Self {
        match mastery {
            0 => Self::Zero,
            1..=50 => Self::AtMostFifty,
            _ => Self::Hundred,
        }
    }

    pub fn all() -> [MasteryTier; 3] {
        [Self::Zero, Self::AtMostFifty, Self::Hundred]
    }
}

impl fmt::Display for MasteryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Zero => "0%",
            Self::AtMostFifty => "<=50%",
            Self::Hundred => "100%",
        };
        f.write_str(label)
    }
}

/// The tier of the weakest touched component, or `None` when nothing matched.
///
/// A student weak in any prerequisite of a mixed-topic question behaves as
/// if weak overall.
pub fn resolve_tier(pairs: &[RelevancePair]) -> Option<MasteryTier> {
    pairs
        .iter()
        .map(|p| p.mastery)
        .min()
        .map(MasteryTier::from_mastery)
}
