//! Keyword inverted index with OR-semantics search.

use std::collections::{BTreeSet, HashMap};

/// Minimum token length (exclusive) kept by the tokenizer.
const MIN_TOKEN_CHARS: usize = 3;

/// Inverted index from lower-cased keywords to item ids.
///
/// Text is tokenized on whitespace, lower-cased, and filtered to tokens
/// longer than three characters. Search applies the same tokenization to the
/// query and unions the id sets of every matching term, so a multi-word
/// query is more permissive, not more precise.
///
/// The index holds ids only; resolving ids back to items (and silently
/// dropping ids with no resolvable item) is the caller's concern.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    terms: HashMap<String, BTreeSet<String>>,
}

impl KeywordIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize text the way both indexing and search do.
    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split_whitespace()
            .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
            .map(str::to_lowercase)
    }

    /// Index an item id under every qualifying token of `text`.
    pub fn index(&mut self, id: &str, text: &str) {
        for token in Self::tokenize(text) {
            self.terms.entry(token).or_default().insert(id.to_string());
        }
    }

    /// Ids matching any term of the query (OR-semantics), deduplicated.
    pub fn search(&self, query: &str) -> Vec<String> {
        let mut matched = BTreeSet::new();
        for token in Self::tokenize(query) {
            if let Some(ids) = self.terms.get(&token) {
                matched.extend(ids.iter().cloned());
            }
        }
        matched.into_iter().collect()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Remove all terms.
    pub fn clear(&mut self) {
        self.terms.clear();
    }
}
