//! Knowledge components and the store that owns them.
//!
//! A knowledge component (KC) is one discrete skill the simulated student
//! may or may not have mastered. The [`KnowledgeStore`] holds the taxonomy in
//! insertion order and rewrites the whole document through its
//! [`KnowledgePersistence`] backend after every mutation.
//!
//! Persistence failures never escape the store: a failed read falls back to
//! the built-in arithmetic taxonomy and a failed write leaves the in-memory
//! state authoritative.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::{KnowledgeError, PersistenceError};

/// Lowest storable mastery.
pub const MASTERY_MIN: u8 = 0;

/// Highest storable mastery.
pub const MASTERY_MAX: u8 = 100;

/// Clamp any integer into the storable mastery range.
pub fn clamp_mastery(value: i64) -> u8 {
    value.clamp(MASTERY_MIN as i64, MASTERY_MAX as i64) as u8
}

/// A single skill in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeComponent {
    id: String,
    name: String,
    description: String,
    keywords: Vec<String>,
    mastery: u8,
}

impl KnowledgeComponent {
    /// Create a component with zero mastery.
    ///
    /// Fails when `id` is empty or `keywords` is empty: a component without
    /// keywords can never be matched against teacher input.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        keywords: Vec<String>,
        description: impl Into<String>,
    ) -> Result<Self, KnowledgeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(KnowledgeError::EmptyId);
        }
        if keywords.is_empty() {
            return Err(KnowledgeError::EmptyKeywords(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            keywords,
            mastery: MASTERY_MIN,
        })
    }

    /// Set the initial mastery, clamped to 0..=100.
    pub fn with_mastery(mut self, mastery: i64) -> Self {
        self.mastery = clamp_mastery(mastery);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn mastery(&self) -> u8 {
        self.mastery
    }

    fn from_record(id: String, record: ComponentRecord) -> Result<Self, KnowledgeError> {
        if !(MASTERY_MIN as i64..=MASTERY_MAX as i64).contains(&record.mastery) {
            return Err(KnowledgeError::MasteryOutOfRange {
                id,
                mastery: record.mastery,
            });
        }
        let mastery = record.mastery;
        Ok(Self::new(id, record.name, record.keywords, record.description)?.with_mastery(mastery))
    }

    fn to_record(&self) -> ComponentRecord {
        ComponentRecord {
            name: self.name.clone(),
            mastery: i64::from(self.mastery),
            keywords: self.keywords.clone(),
            description: self.description.clone(),
        }
    }
}

// ── Persisted document ────────────────────────────────────────────────────

/// On-disk shape of one component, keyed by its id in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    pub mastery: i64,
    pub keywords: Vec<String>,
    pub description: String,
}

/// The persisted taxonomy: a JSON object from component id to record.
///
/// Key order is preserved in both directions. A duplicated key keeps the
/// position of its first occurrence and the value of its last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeDocument {
    entries: Vec<(String, ComponentRecord)>,
}

impl KnowledgeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `id`.
    pub fn insert(&mut self, id: impl Into<String>, record: ComponentRecord) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = record,
            None => self.entries.push((id, record)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ComponentRecord> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Validate every record into a component list.
    pub fn into_components(self) -> Result<Vec<KnowledgeComponent>, KnowledgeError> {
        self.entries
            .into_iter()
            .map(|(id, record)| KnowledgeComponent::from_record(id, record))
            .collect()
    }

    fn from_components(components: &[KnowledgeComponent]) -> Self {
        Self {
            entries: components
                .iter()
                .map(|c| (c.id.clone(), c.to_record()))
                .collect(),
        }
    }
}

impl Serialize for KnowledgeDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KnowledgeDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = KnowledgeDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from knowledge component id to component record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut document = KnowledgeDocument::new();
                while let Some((id, record)) = access.next_entry::<String, ComponentRecord>()? {
                    document.insert(id, record);
                }
                Ok(document)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// Backend the store reads at startup and rewrites after every mutation.
pub trait KnowledgePersistence: Send + Sync {
    /// A short name for log lines (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Read the persisted document. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<KnowledgeDocument>, PersistenceError>;

    /// Replace the persisted document wholesale.
    fn persist(&self, document: &KnowledgeDocument) -> Result<(), PersistenceError>;
}

// ── Store ─────────────────────────────────────────────────────────────────

/// The owned, ordered taxonomy plus its persistence backend.
pub struct KnowledgeStore {
    components: Vec<KnowledgeComponent>,
    persistence: Box<dyn KnowledgePersistence>,
}

impl KnowledgeStore {
    /// Load the taxonomy from `persistence`.
    ///
    /// Anything other than a readable, parseable, valid document is treated
    /// as absent: the default taxonomy is used and written back immediately.
    pub fn load(persistence: Box<dyn KnowledgePersistence>) -> Self {
        let loaded = match persistence.load() {
            Ok(Some(document)) => match document.into_components() {
                Ok(components) => Some(components),
                Err(e) => {
                    warn!(backend = persistence.name(), error = %e, "Invalid knowledge document, using defaults");
                    None
                }
            },
            Ok(None) => {
                debug!(backend = persistence.name(), "No knowledge document yet");
                None
            }
            Err(e) => {
                warn!(backend = persistence.name(), error = %e, "Failed to load knowledge document, using defaults");
                None
            }
        };

        match loaded {
            Some(components) => {
                info!(count = components.len(), backend = persistence.name(), "Knowledge components loaded");
                Self {
                    components,
                    persistence,
                }
            }
            None => {
                let store = Self {
                    components: default_components(),
                    persistence,
                };
                store.persist();
                store
            }
        }
    }

    /// Build a store from explicit components without touching persistence.
    pub fn with_components(
        components: Vec<KnowledgeComponent>,
        persistence: Box<dyn KnowledgePersistence>,
    ) -> Self {
        Self {
            components,
            persistence,
        }
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Mastery for `id`; unknown ids read as 0.
    pub fn get_mastery(&self, id: &str) -> u8 {
        self.get(id).map(|c| c.mastery).unwrap_or(MASTERY_MIN)
    }

    /// Set mastery for `id`, clamped to 0..=100, and persist.
    ///
    /// Returns `false` and changes nothing when `id` is unknown.
    pub fn update_mastery(&mut self, id: &str, value: i64) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            debug!(id, "Ignoring mastery update for unknown component");
            return false;
        };
        component.mastery = clamp_mastery(value);
        debug!(id, mastery = component.mastery, "Mastery updated");
        self.persist();
        true
    }

    /// Insert a component, replacing any existing one with the same id in place, and persist.
    pub fn add_component(&mut self, component: KnowledgeComponent) {
        match self.components.iter_mut().find(|c| c.id == component.id) {
            Some(existing) => *existing = component,
            None => self.components.push(component),
        }
        self.persist();
    }

    /// All components in insertion order.
    pub fn all_components(&self) -> &[KnowledgeComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Snapshot of the store in its persisted shape.
    pub fn to_document(&self) -> KnowledgeDocument {
        KnowledgeDocument::from_components(&self.components)
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.persist(&self.to_document()) {
            warn!(backend = self.persistence.name(), error = %e, "Failed to persist knowledge components");
        }
    }
}

impl fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("components", &self.components)
            .field("persistence", &self.persistence.name())
            .finish()
    }
}

/// The built-in elementary arithmetic taxonomy.
pub fn default_components() -> Vec<KnowledgeComponent> {
    const DEFAULTS: &[(&str, &str, u8, &[&str], &str)] = &[
        (
            "basic_addition",
            "Basic Addition (single digit)",
            100,
            &["add", "plus", "+", "sum"],
            "Adding single digit numbers",
        ),
        (
            "carry_addition",
            "Addition with Carrying (two digit)",
            50,
            &["carry", "two digit", "double digit"],
            "Adding two digit numbers requiring carrying",
        ),
        (
            "basic_subtraction",
            "Basic Subtraction",
            100,
            &["subtract", "minus", "-", "difference"],
            "Basic subtraction operations",
        ),
        (
            "borrowing_subtraction",
            "Subtraction with Borrowing",
            0,
            &["borrow", "regroup"],
            "Subtraction requiring borrowing/regrouping",
        ),
        (
            "multiplication_tables",
            "Multiplication Tables",
            50,
            &["multiply", "times", "×", "*"],
            "Basic multiplication facts",
        ),
        (
            "long_multiplication",
            "Long Multiplication",
            0,
            &["long multiplication", "multi-digit multiplication"],
            "Multi-digit multiplication",
        ),
        (
            "basic_division",
            "Basic Division",
            0,
            &["divide", "÷", "/", "division"],
            "Basic division operations",
        ),
        (
            "place_value",
            "Place Value Understanding",
            100,
            &["ones", "tens", "hundreds", "place value"],
            "Understanding place value in numbers",
        ),
    ];

    DEFAULTS
        .iter()
        .map(|&(id, name, mastery, keywords, description)| KnowledgeComponent {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            mastery,
        })
        .collect()
}
