//! # Search Index
//!
//! Free-text lookup over node `title` and `content`.
//!
//! ## Normalization
//!
//! Text is folded before it is split into tokens, so that `Été`, `ete` and
//! `ÉTÉ` all land on the same token:
//!
//! 1. NFKD decomposition (`é` becomes `e` + combining acute)
//! 2. Combining marks dropped
//! 3. Lowercased
//! 4. Split on anything that is not alphanumeric
//!
//! ## Scoring
//!
//! Each occurrence of a query token adds to a node's score: 2 for a title
//! occurrence, 1 for a content occurrence. Query tokens are OR-ed, so a node
//! matching more of them ranks higher. Ties break on node id to keep results
//! stable.
//!
//! ## Maintenance
//!
//! The index is built once from all nodes and then kept current by calling
//! [`SearchIndex::upsert`] and [`SearchIndex::remove`] on every node write.
//! Queries never rebuild it.

use crate::model::{Node, NodeId};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const TITLE_WEIGHT: u32 = 2;
const CONTENT_WEIGHT: u32 = 1;

/// Case- and diacritic-insensitive form of `text`.
pub fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Folded tokens of `text`, in order, duplicates kept.
pub fn tokenize(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub node_id: NodeId,
    pub score: u32,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    /// token -> node -> weighted occurrence count
    postings: HashMap<String, HashMap<NodeId, u32>>,
    /// node -> tokens it was indexed under, for removal
    indexed: HashMap<NodeId, Vec<String>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut index = Self::new();
        for node in nodes {
            index.upsert(node);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.indexed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexed.is_empty()
    }

    /// Indexes `node`, replacing whatever was indexed for its id before.
    pub fn upsert(&mut self, node: &Node) {
        self.remove(&node.node_id);

        let mut weights: HashMap<String, u32> = HashMap::new();
        for token in tokenize(&node.title) {
            *weights.entry(token).or_default() += TITLE_WEIGHT;
        }
        for token in tokenize(&node.content) {
            *weights.entry(token).or_default() += CONTENT_WEIGHT;
        }

        let tokens: Vec<String> = weights.keys().cloned().collect();
        for (token, weight) in weights {
            self.postings
                .entry(token)
                .or_default()
                .insert(node.node_id.clone(), weight);
        }
        self.indexed.insert(node.node_id.clone(), tokens);
    }

    /// Drops `id` from the index. Returns whether it was indexed.
    pub fn remove(&mut self, id: &NodeId) -> bool {
        let Some(tokens) = self.indexed.remove(id) else {
            return false;
        };
        for token in tokens {
            if let Some(docs) = self.postings.get_mut(&token) {
                docs.remove(id);
                if docs.is_empty() {
                    self.postings.remove(&token);
                }
            }
        }
        true
    }

    /// Ranked hits for `term`, best first. A term with no tokens matches
    /// nothing.
    pub fn query(&self, term: &str) -> Vec<SearchHit> {
        let mut query_tokens = tokenize(term);
        query_tokens.sort();
        query_tokens.dedup();

        let mut scores: HashMap<&NodeId, u32> = HashMap::new();
        for token in &query_tokens {
            if let Some(docs) = self.postings.get(token) {
                for (id, weight) in docs {
                    *scores.entry(id).or_default() += weight;
                }
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .map(|(id, score)| SearchHit {
                node_id: id.clone(),
                score,
            })
            .collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.node_id.cmp(&b.node_id)));
        hits
    }
}
