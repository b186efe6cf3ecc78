//! Template snapshots: named, persisted copies of the full selection state.
//!
//! Snapshots carry an explicit schema version. Loading applies one migration
//! function per version step, then re-resolves every stored axis id against
//! the current taxonomy so entries deleted since the save fall back to axis
//! defaults.

use crate::selection::SelectionState;
use crate::taxonomy::{Axis, Taxonomy};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Current snapshot schema version
pub const SCHEMA_VERSION: u32 = 2;

/// Errors from snapshot operations
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("Snapshot schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("Snapshot payload malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Snapshot file error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named serialized copy of the selection state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default = "v1_version")]
    pub schema_version: u32,
    pub template_data: Value,
    pub created_at: DateTime<Utc>,
}

/// Snapshots written before versioning are version 1
fn v1_version() -> u32 {
    1
}

// ============================================================================
// MIGRATIONS
// ============================================================================

/// Migrate a version-1 payload to version 2.
///
/// Version 1 predates the image slots, the author byline and the rename of
/// `channels` to `distribution_channels`.
fn migrate_v1_to_v2(mut data: Value) -> Value {
    if let Some(map) = data.as_object_mut() {
        if let Some(channels) = map.remove("channels") {
            map.entry("distribution_channels").or_insert(channels);
        }
        map.entry("hero_image").or_insert(serde_json::json!({}));
        map.entry("body_image").or_insert(serde_json::json!({}));
        map.entry("footer_image").or_insert(serde_json::json!({}));
        map.entry("author_name").or_insert(Value::String(String::new()));
    }
    data
}

/// Run the migration chain from `version` up to [`SCHEMA_VERSION`], then
/// deserialize. Fields absent from every known version fall back to the
/// state defaults.
pub fn migrate(version: u32, mut data: Value) -> Result<SelectionState, SnapshotError> {
    if version > SCHEMA_VERSION {
        return Err(SnapshotError::UnsupportedSchema {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    let mut current = version;
    while current < SCHEMA_VERSION {
        data = match current {
            1 => migrate_v1_to_v2(data),
            _ => data,
        };
        current += 1;
        debug!(from = current - 1, to = current, "migrated snapshot payload");
    }
    Ok(serde_json::from_value(data)?)
}

// ============================================================================
// STORE
// ============================================================================

/// In-memory snapshot collection with JSON file persistence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotStore {
    snapshots: IndexMap<String, TemplateSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a named copy of the current state
    pub fn save(&mut self, name: &str, state: &SelectionState) -> Result<String, SnapshotError> {
        let snapshot = TemplateSnapshot {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            schema_version: SCHEMA_VERSION,
            template_data: serde_json::to_value(state)?,
            created_at: Utc::now(),
        };
        let id = snapshot.id.clone();
        self.snapshots.insert(id.clone(), snapshot);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<&TemplateSnapshot> {
        self.snapshots.get(id)
    }

    /// All snapshots, newest first
    pub fn list(&self) -> Vec<&TemplateSnapshot> {
        let mut all: Vec<&TemplateSnapshot> = self.snapshots.values().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Remove a snapshot. No cascading effects.
    pub fn delete(&mut self, id: &str) -> Result<(), SnapshotError> {
        self.snapshots
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| SnapshotError::NotFound(id.to_string()))
    }

    /// Restore a snapshot against the current taxonomy.
    ///
    /// Single-select ids that no longer exist resolve to the axis default;
    /// stale multi-select ids are dropped; free text and toggles apply
    /// verbatim.
    pub fn load(
        &self,
        id: &str,
        taxonomy: &Taxonomy,
    ) -> Result<SelectionState, SnapshotError> {
        let snapshot = self
            .get(id)
            .ok_or_else(|| SnapshotError::NotFound(id.to_string()))?;
        let state = migrate(snapshot.schema_version, snapshot.template_data.clone())?;
        Ok(normalize(state, taxonomy))
    }

    /// Load a store from a JSON file; missing file yields an empty store
    pub fn load_file(path: &Path) -> Result<Self, SnapshotError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the store to a JSON file
    pub fn save_file(&self, path: &Path) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Re-resolve every stored axis id against the current taxonomy
fn normalize(mut state: SelectionState, taxonomy: &Taxonomy) -> SelectionState {
    for axis in Axis::all() {
        if axis.is_multi() {
            continue;
        }
        let resolved = taxonomy
            .resolve(axis, state.single_id(axis))
            .map(|opt| opt.id.clone());
        state.set_single(axis, resolved);
    }
    for axis in [Axis::Competitor, Axis::Multimodal, Axis::DistributionChannel] {
        let kept: Vec<String> = state
            .multi_ids(axis)
            .iter()
            .filter(|id| taxonomy.find(axis, id).is_some())
            .cloned()
            .collect();
        match axis {
            Axis::Competitor => state.competitors = kept,
            Axis::Multimodal => state.multimodal = kept,
            Axis::DistributionChannel => state.distribution_channels = kept,
            _ => unreachable!(),
        }
    }
    // Knowledge refs resolve against the knowledge store at composition
    // time, not here.
    state
}
