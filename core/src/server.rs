use crate::config::SearchConfig;
use crate::document::{Document, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::execution::ExecutionPolicy;
use crate::index::{InvertedIndex, Word, WordFrequencies};
use crate::query::QueryParser;
use crate::ranking::Ranker;
use crate::storage::{DocumentIds, DocumentStore};
use crate::tokenizer::{word_spans, StopWords};
use crate::{DocId, Rating};
use rayon::prelude::*;
use std::sync::Arc;

/// Result of matching a query against a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedDocument<'a> {
    /// Matched plus-words, sorted and distinct. Empty when a minus-word hit.
    pub words: Vec<&'a str>,
    pub status: DocumentStatus,
}

/// The search engine: document store, inverted index and fixed stop words.
///
/// Mutations take `&mut self` and queries take `&self`, so a query can never
/// overlap a mutation on the same instance. Share it behind an `RwLock` when
/// writers and readers live on different threads.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    store: DocumentStore,
    index: InvertedIndex,
    config: SearchConfig,
}

impl SearchServer {
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, SearchConfig::default())
    }

    /// Build from whitespace separated stop words.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::from_parts(StopWords::from_text(text)?, SearchConfig::default())
    }

    pub fn with_config<I, S>(stop_words: I, config: SearchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_parts(StopWords::new(stop_words)?, config)
    }

    pub fn from_parts(stop_words: StopWords, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { stop_words, store: DocumentStore::new(), index: InvertedIndex::new(), config })
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[Rating]) -> Result<()> {
        let text = self.store.insert(id, text, status, ratings)?;
        let words: Vec<Word> = word_spans(&text)
            .filter(|&(s, e)| !self.stop_words.contains(&text[s..e]))
            .map(|(s, e)| Word::new(Arc::clone(&text), s, e))
            .collect();
        let word_count = words.len();
        self.index.insert_document(id, words);
        tracing::debug!(id, word_count, %status, vocabulary = self.index.vocabulary_size(), "document added");
        Ok(())
    }

    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_policy(ExecutionPolicy::Sequential, raw_query)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_with_policy(ExecutionPolicy::Sequential, raw_query, status)
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        self.find_top_documents_by_with_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_with_policy(&self, policy: ExecutionPolicy, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_with_policy(policy, raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_with_policy(policy, raw_query, move |_, s, _| s == status)
    }

    /// Top documents passing `predicate(id, status, rating)`, best first.
    pub fn find_top_documents_by_with_policy<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let query = QueryParser::new(&self.stop_words).parse(raw_query, policy)?;
        Ok(self.ranker().find_top_documents(&query, &predicate, policy))
    }

    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<MatchedDocument<'_>> {
        self.match_document_with_policy(ExecutionPolicy::Sequential, raw_query, id)
    }

    pub fn match_document_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<MatchedDocument<'_>> {
        let Some(data) = self.store.get(id) else {
            return Err(SearchError::out_of_range(format!("document {id} does not exist")));
        };
        let status = data.status;
        let query = QueryParser::new(&self.stop_words).parse(raw_query, policy)?;
        let freqs = self.index.word_frequencies(id);
        let lookup = |word: &&str| freqs.get_key_value(*word).map(|(w, _)| w.as_str());

        let words = match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(|w| freqs.contains_key(*w)) {
                    Vec::new()
                } else {
                    // Plus-words come sorted and distinct from the sequential parser.
                    query.plus_words.iter().filter_map(lookup).collect()
                }
            }
            ExecutionPolicy::Parallel => {
                if query.minus_words.par_iter().any(|w| freqs.contains_key(*w)) {
                    Vec::new()
                } else {
                    let mut words: Vec<&str> = query.plus_words.par_iter().filter_map(lookup).collect();
                    words.par_sort_unstable();
                    words.dedup();
                    words
                }
            }
        };
        Ok(MatchedDocument { words, status })
    }

    /// Term frequencies of a document; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies { self.index.word_frequencies(id) }

    pub fn remove_document(&mut self, id: DocId) -> Result<()> {
        self.remove_document_with_policy(ExecutionPolicy::Sequential, id)
    }

    pub fn remove_document_with_policy(&mut self, policy: ExecutionPolicy, id: DocId) -> Result<()> {
        if !self.store.contains(id) {
            return Err(SearchError::out_of_range(format!("document {id} does not exist")));
        }
        self.index.remove_document(id, policy);
        self.store.remove(id);
        tracing::debug!(id, %policy, "document removed");
        Ok(())
    }

    pub fn document_count(&self) -> usize { self.store.len() }

    pub fn document_ids(&self) -> DocumentIds<'_> { self.store.ids() }

    pub fn document_status(&self, id: DocId) -> Option<DocumentStatus> { self.store.get(id).map(|d| d.status) }

    pub fn document_rating(&self, id: DocId) -> Option<Rating> { self.store.get(id).map(|d| d.rating) }

    /// `ln(N / df)` for an indexed word.
    pub fn inverse_document_freq(&self, word: &str) -> Option<f64> { self.ranker().inverse_document_freq(word) }

    /// Whether any posting or reverse entry still mentions `id`.
    pub fn index_references(&self, id: DocId) -> bool { self.index.is_referenced(id) }

    fn ranker(&self) -> Ranker<'_> { Ranker::new(&self.index, &self.store, &self.config) }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter { self.document_ids() }
}
