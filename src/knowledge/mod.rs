//! Knowledge store: operator-curated reference entries that the composition
//! engine injects into the instruction document.
//!
//! The authoritative text of an entry is always `content`; chunks are a
//! derived addressing layer regenerated on every content change.

mod chunker;
mod retrieval;

pub use chunker::{chunk, merge, split, KnowledgeChunk};
pub use retrieval::{retrieve, retrieve_with_rng, RetrievalHit, TOP_N};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Errors from knowledge-store operations
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge item not found: {0}")]
    NotFound(String),

    #[error("Knowledge file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Knowledge file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How the composition engine treats an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefMode {
    /// Optional context the generated piece may draw on
    #[default]
    Smart,
    /// Non-negotiable constraint the generated piece must not contradict
    Strict,
}

/// A single knowledge entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub ref_mode: RefMode,
    #[serde(default)]
    pub is_archived: bool,
    /// Derived chunks; regenerated from `content` at any time
    #[serde(default)]
    pub chunks: Option<Vec<KnowledgeChunk>>,
    #[serde(default = "initial_version")]
    pub version: u32,
}

fn initial_version() -> u32 {
    1
}

/// In-memory knowledge collection, insertion-ordered, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeStore {
    items: IndexMap<String, KnowledgeItem>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entry from operator input. Chunks are derived immediately.
    pub fn insert(&mut self, title: &str, content: &str, ref_mode: RefMode) -> &KnowledgeItem {
        let id = Uuid::new_v4().to_string();
        let item = KnowledgeItem {
            id: id.clone(),
            title: title.to_string(),
            content: content.to_string(),
            tags: BTreeSet::new(),
            ref_mode,
            is_archived: false,
            chunks: Some(chunk(content)),
            version: 1,
        };
        self.items.insert(id.clone(), item);
        &self.items[&id]
    }

    /// Insert a fully-formed item (snapshot restore, file import)
    pub fn insert_item(&mut self, item: KnowledgeItem) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeItem> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut KnowledgeItem> {
        self.items.get_mut(id)
    }

    /// Rewrite title/content of an entry, bump its version and regenerate
    /// its chunks.
    pub fn update(&mut self, id: &str, title: &str, content: &str) -> Result<(), KnowledgeError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;
        item.title = title.to_string();
        item.content = content.to_string();
        item.chunks = Some(chunk(content));
        item.version += 1;
        Ok(())
    }

    pub fn set_archived(&mut self, id: &str, archived: bool) -> Result<(), KnowledgeError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;
        item.is_archived = archived;
        Ok(())
    }

    /// Hard delete. Only reachable through an explicit operator action.
    pub fn remove(&mut self, id: &str) -> Result<KnowledgeItem, KnowledgeError> {
        self.items
            .shift_remove(id)
            .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))
    }

    pub fn items(&self) -> impl Iterator<Item = &KnowledgeItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load a store from a JSON file. A missing file yields an empty store;
    /// a malformed file is an error and leaves nothing half-loaded.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the store to a JSON file.
    ///
    /// Primary fields always serialize; derived chunk data is written
    /// best-effort and dropped with a warning if it cannot be encoded, so a
    /// stale chunk layer never blocks persistence.
    pub fn save(&self, path: &Path) -> Result<(), KnowledgeError> {
        let mut persistable = self.clone();
        for item in persistable.items.values_mut() {
            if let Some(chunks) = &item.chunks {
                if serde_json::to_value(chunks).is_err() {
                    warn!(item = %item.id, "dropping unencodable chunk data from save");
                    item.chunks = None;
                }
            }
        }
        let raw = serde_json::to_string_pretty(&persistable)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
