// Library exports for the copyforge authoring console
pub mod cli;
pub mod compose;
pub mod config;
pub mod knowledge;
pub mod selection;
pub mod snapshot;
pub mod taxonomy;

// Re-export key types for convenience
pub use compose::{compose, OutputFormat, PromptComposer};
pub use config::ConsoleConfig;
pub use knowledge::{
    chunk, merge, retrieve, retrieve_with_rng, split, KnowledgeChunk, KnowledgeError,
    KnowledgeItem, KnowledgeStore, RefMode, RetrievalHit,
};
pub use selection::{ImageSlot, OutputSections, ResolvedSelection, SelectionState};
pub use snapshot::{SnapshotError, SnapshotStore, TemplateSnapshot, SCHEMA_VERSION};
pub use taxonomy::{Axis, CatalogOption, MultimodalKind, OptionDetail, Taxonomy};
