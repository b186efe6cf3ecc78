//! Sentence chunking for knowledge entries.
//!
//! Chunks are an addressing layer over an entry's content, used by retrieval
//! display and manual review. All scanning is char-based so CJK content
//! never lands on a byte boundary.

use serde::{Deserialize, Serialize};

/// Fragments shorter than this (in chars, after trimming) are noise
const MIN_FRAGMENT_CHARS: usize = 5;

/// Upper bound on the degenerate chunk produced for unchunkable content
const DEGENERATE_PREFIX_CHARS: usize = 120;

/// An addressable fragment of a knowledge entry.
///
/// `start_line..end_line` is the range of originating sentence indices;
/// the degenerate chunk carries the range (0, 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: String,
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '。' | '！' | '？' | '\n')
}

/// Split content into trimmed sentences, discarding fragments below the
/// minimum length.
fn sentences(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in content.chars() {
        if is_terminator(c) {
            if c != '\n' {
                current.push(c);
            }
            let trimmed = current.trim();
            if trimmed.chars().count() >= MIN_FRAGMENT_CHARS {
                out.push(trimmed.to_string());
            }
            current.clear();
        } else {
            current.push(c);
        }
    }
    let trimmed = current.trim();
    if trimmed.chars().count() >= MIN_FRAGMENT_CHARS {
        out.push(trimmed.to_string());
    }
    out
}

/// Derive the chunk list for an entry's content.
///
/// Surviving sentences are grouped two at a time; each chunk records the
/// sentence index range it came from. Content with no usable sentence yields
/// a single chunk holding a bounded prefix of the raw text.
pub fn chunk(content: &str) -> Vec<KnowledgeChunk> {
    let sentences = sentences(content);
    if sentences.is_empty() {
        let prefix: String = content.chars().take(DEGENERATE_PREFIX_CHARS).collect();
        return vec![KnowledgeChunk {
            id: "c1".to_string(),
            text: prefix.trim().to_string(),
            start_line: 0,
            end_line: 0,
        }];
    }

    sentences
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| KnowledgeChunk {
            id: format!("c{}", i + 1),
            text: pair.join(" "),
            start_line: i * 2,
            end_line: i * 2 + pair.len() - 1,
        })
        .collect()
}

/// Merge chunk `i` with its successor.
///
/// The merged chunk keeps chunk `i`'s id, joins the two texts with a single
/// space and extends the index range to chunk `i+1`'s end. A no-op when `i`
/// is the last index.
pub fn merge(chunks: &[KnowledgeChunk], i: usize) -> Vec<KnowledgeChunk> {
    if i + 1 >= chunks.len() {
        return chunks.to_vec();
    }
    let mut out = Vec::with_capacity(chunks.len() - 1);
    out.extend_from_slice(&chunks[..i]);
    out.push(KnowledgeChunk {
        id: chunks[i].id.clone(),
        text: format!("{} {}", chunks[i].text, chunks[i + 1].text),
        start_line: chunks[i].start_line,
        end_line: chunks[i + 1].end_line,
    });
    out.extend_from_slice(&chunks[i + 2..]);
    out
}

/// Split chunk `i` at the first sentence terminator at or after the char
/// midpoint of its text, falling back to the raw midpoint when none exists
/// before the final char.
///
/// The derived chunks take ids `<id>-a` / `<id>-b` and inherit the original
/// index range. A no-op when the text is too short to divide.
pub fn split(chunks: &[KnowledgeChunk], i: usize) -> Vec<KnowledgeChunk> {
    let Some(target) = chunks.get(i) else {
        return chunks.to_vec();
    };
    let chars: Vec<char> = target.text.chars().collect();
    if chars.len() < 2 {
        return chunks.to_vec();
    }

    let mid = chars.len() / 2;
    let cut = chars[mid..chars.len() - 1]
        .iter()
        .position(|c| is_terminator(*c))
        .map(|offset| mid + offset + 1)
        .unwrap_or(mid);

    let first: String = chars[..cut].iter().collect();
    let second: String = chars[cut..].iter().collect();

    let mut out = Vec::with_capacity(chunks.len() + 1);
    out.extend_from_slice(&chunks[..i]);
    out.push(KnowledgeChunk {
        id: format!("{}-a", target.id),
        text: first.trim_end().to_string(),
        start_line: target.start_line,
        end_line: target.end_line,
    });
    out.push(KnowledgeChunk {
        id: format!("{}-b", target.id),
        text: second.trim_start().to_string(),
        start_line: target.start_line,
        end_line: target.end_line,
    });
    out.extend_from_slice(&chunks[i + 1..]);
    out
}
