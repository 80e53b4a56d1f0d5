//! Fuzzy search over a registry snapshot.
//!
//! An index is built per query from a snapshot of the registry's values and
//! discarded afterwards; searching never mutates the primary mapping. Nodes
//! are scored on `name` and `contents` with a normalized dissimilarity in
//! [0, 1] where lower is closer, and only hits under a fixed threshold are
//! kept, ranked best first.

use crate::node::FileNode;
use std::cmp::Ordering;

/// Maximum dissimilarity for a hit to be included.
pub const SCORE_THRESHOLD: f64 = 0.2;

/// Ephemeral fuzzy matcher over a set of nodes.
pub struct FuzzyIndex {
    entries: Vec<FileNode>,
}

impl FuzzyIndex {
    pub fn build(entries: Vec<FileNode>) -> Self {
        Self { entries }
    }

    /// Nodes matching `query` under the threshold, best match first.
    /// An empty query yields no hits.
    pub fn search(&self, query: &str) -> Vec<FileNode> {
        if query.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(f64, &FileNode)> = self
            .entries
            .iter()
            .filter_map(|node| {
                let score = node_score(query, node)?;
                (score <= SCORE_THRESHOLD).then_some((score, node))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.name.cmp(&b.1.name))
        });
        hits.into_iter().map(|(_, node)| node.clone()).collect()
    }
}

/// Best score across the matched fields, or `None` when neither matches.
fn node_score(query: &str, node: &FileNode) -> Option<f64> {
    match (
        field_score(query, &node.name),
        field_score(query, &node.contents),
    ) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Dissimilarity of `query` against one field.
///
/// Scans for the query as an in-order character subsequence, anchored at each
/// occurrence of its first character, and scores the tightest window found:
/// 0.0 for a contiguous occurrence, approaching 1.0 as the matched characters
/// spread out. `None` when the query is not a subsequence at all.
fn field_score(query: &str, text: &str) -> Option<f64> {
    let query: Vec<char> = query.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();
    if query.is_empty() || query.len() > text.len() {
        return None;
    }

    let mut best_span: Option<usize> = None;
    for start in 0..=(text.len() - query.len()) {
        if text[start] != query[0] {
            continue;
        }
        let mut qi = 1;
        let mut end = start;
        for (ti, ch) in text.iter().enumerate().skip(start + 1) {
            if qi == query.len() {
                break;
            }
            if *ch == query[qi] {
                end = ti;
                qi += 1;
            }
        }
        if qi == query.len() {
            let span = end - start + 1;
            best_span = Some(best_span.map_or(span, |b| b.min(span)));
            if span == query.len() {
                // Contiguous; no tighter window exists.
                break;
            }
        }
    }

    best_span.map(|span| 1.0 - query.len() as f64 / span as f64)
}
