use crate::execution::ExecutionPolicy;
use crate::DocId;
use rayon::prelude::*;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A word view into a stored document text: shared handle plus byte span.
///
/// Compares, hashes and borrows as the `str` it spans, so maps keyed by
/// `Word` are looked up with plain `&str`.
#[derive(Clone)]
pub struct Word {
    text: Arc<str>,
    start: usize,
    end: usize,
}

impl Word {
    pub fn new(text: Arc<str>, start: usize, end: usize) -> Self {
        debug_assert!(text.is_char_boundary(start) && text.is_char_boundary(end) && start <= end);
        Self { text, start, end }
    }

    pub fn as_str(&self) -> &str { &self.text[self.start..self.end] }
}

impl Deref for Word {
    type Target = str;
    fn deref(&self) -> &str { self.as_str() }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str { self.as_str() }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str { self.as_str() }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool { self.as_str() == other.as_str() }
}

impl Eq for Word {}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering { self.as_str().cmp(other.as_str()) }
}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) { self.as_str().hash(state) }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(self.as_str(), f) }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// doc id → term frequency, for one word.
pub type Postings = BTreeMap<DocId, f64>;

/// word → term frequency, for one document.
pub type WordFrequencies = BTreeMap<Word, f64>;

static EMPTY_FREQUENCIES: WordFrequencies = BTreeMap::new();

/// Postings kept in both directions. Every mutation goes through this type so
/// the two views always agree.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_document_freqs: BTreeMap<Word, Postings>,
    document_to_word_freqs: BTreeMap<DocId, WordFrequencies>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record the (already stop-word filtered) words of a new document.
    pub fn insert_document(&mut self, id: DocId, words: Vec<Word>) {
        let mut counts: BTreeMap<Word, u32> = BTreeMap::new();
        for word in &words {
            *counts.entry(word.clone()).or_insert(0) += 1;
        }
        let total = words.len() as f64;

        let freqs = self.document_to_word_freqs.entry(id).or_default();
        for (word, count) in counts {
            let tf = f64::from(count) / total;
            self.word_to_document_freqs.entry(word.clone()).or_default().insert(id, tf);
            freqs.insert(word, tf);
        }
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> { self.word_to_document_freqs.get(word) }

    /// Number of documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings(word).map_or(0, BTreeMap::len)
    }

    /// Term frequencies of one document; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies {
        self.document_to_word_freqs.get(&id).unwrap_or(&EMPTY_FREQUENCIES)
    }

    pub fn vocabulary_size(&self) -> usize { self.word_to_document_freqs.len() }

    /// Whether any posting list still mentions `id`. Walks the whole vocabulary.
    pub fn is_referenced(&self, id: DocId) -> bool {
        self.word_to_document_freqs.values().any(|p| p.contains_key(&id))
            || self.document_to_word_freqs.contains_key(&id)
    }

    /// Erase a document from both directions. Returns `false` if it was not indexed.
    pub fn remove_document(&mut self, id: DocId, policy: ExecutionPolicy) -> bool {
        let Some(freqs) = self.document_to_word_freqs.remove(&id) else {
            return false;
        };
        match policy {
            ExecutionPolicy::Sequential => self.erase_postings_seq(id, &freqs),
            ExecutionPolicy::Parallel => self.erase_postings_par(id, &freqs),
        }
        true
    }

    fn erase_postings_seq(&mut self, id: DocId, freqs: &WordFrequencies) {
        for word in freqs.keys() {
            if let Some(postings) = self.word_to_document_freqs.get_mut(word.as_str()) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.word_to_document_freqs.remove(word.as_str());
                }
            }
        }
    }

    // Posting lists are detached from the map first, so every worker owns a
    // disjoint list and no structure is iterated while it shrinks.
    fn erase_postings_par(&mut self, id: DocId, freqs: &WordFrequencies) {
        let words: Vec<&str> = freqs.keys().map(Word::as_str).collect();
        let mut detached: Vec<(Word, Postings)> = words
            .iter()
            .filter_map(|w| self.word_to_document_freqs.remove_entry(*w))
            .collect();

        detached.par_iter_mut().for_each(|(_, postings)| {
            postings.remove(&id);
        });

        for (word, postings) in detached {
            if !postings.is_empty() {
                self.word_to_document_freqs.insert(word, postings);
            }
        }
    }
}
