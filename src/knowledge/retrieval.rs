//! Retrieval scoring over the knowledge store.
//!
//! Lexical containment scoring with a small jitter term, standing in for
//! semantic search. The jitter source is injectable so callers that need
//! reproducible rankings (tests, batch tooling) can seed it.

use super::{KnowledgeItem, KnowledgeStore};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum number of hits returned
pub const TOP_N: usize = 5;

/// Hits at or below this score are dropped as noise
const SCORE_FLOOR: f64 = 0.05;

/// Scores are capped here so jitter never produces a perfect 1.0
const SCORE_CAP: f64 = 0.99;

/// Chars of content surfaced as the matched excerpt
const EXCERPT_CHARS: usize = 120;

/// A single ranked retrieval hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub item_id: String,
    pub title: String,
    /// Relevance score in (0.05, 0.99]
    pub score: f64,
    /// Leading excerpt of the item's content
    pub excerpt: String,
}

/// Score one item against a lowercased query
fn score_item(item: &KnowledgeItem, query_lower: &str, jitter: f64) -> f64 {
    let mut score = 0.0;
    if item.title.to_lowercase().contains(query_lower) {
        score += 0.4;
    }
    if item.content.to_lowercase().contains(query_lower) {
        score += 0.3;
    }
    if item
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(query_lower))
    {
        score += 0.2;
    }
    (score + jitter).min(SCORE_CAP)
}

/// Rank non-archived knowledge items against a free-text query.
///
/// Ranking order depends on the jitter drawn from `rng`; pass a seeded rng
/// for reproducible output.
pub fn retrieve_with_rng<R: Rng>(
    query: &str,
    store: &KnowledgeStore,
    rng: &mut R,
) -> Vec<RetrievalHit> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<RetrievalHit> = store
        .items()
        .filter(|item| !item.is_archived)
        .filter_map(|item| {
            let jitter = rng.gen_range(0.0..0.1);
            let score = score_item(item, &query_lower, jitter);
            if score <= SCORE_FLOOR {
                return None;
            }
            Some(RetrievalHit {
                item_id: item.id.clone(),
                title: item.title.clone(),
                score,
                excerpt: item.content.chars().take(EXCERPT_CHARS).collect(),
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(TOP_N);
    hits
}

/// [`retrieve_with_rng`] with a thread-local rng
pub fn retrieve(query: &str, store: &KnowledgeStore) -> Vec<RetrievalHit> {
    retrieve_with_rng(query, store, &mut rand::thread_rng())
}
