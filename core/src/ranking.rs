//! TF-IDF ranking over the inverted index.
//!
//! One algorithm, two drivers: the sequential path accumulates into a plain
//! `BTreeMap`, the parallel path spreads the distinct plus-words over rayon
//! and accumulates into a [`ConcurrentMap`].

use crate::concurrent_map::ConcurrentMap;
use crate::config::SearchConfig;
use crate::document::{Document, DocumentStatus};
use crate::execution::ExecutionPolicy;
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::storage::DocumentStore;
use crate::{DocId, Rating};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Order hits best first: relevance descending, then rating descending
/// inside each run of relevances within `epsilon` of the run's first hit.
///
/// Ties are grouped after a total-order sort, so the comparator handed to the
/// sort stays transitive however densely relevances cluster.
pub fn sort_documents(docs: &mut [Document], epsilon: f64, policy: ExecutionPolicy) {
    let by_relevance = |l: &Document, r: &Document| r.relevance.total_cmp(&l.relevance);
    match policy {
        ExecutionPolicy::Sequential => docs.sort_by(by_relevance),
        ExecutionPolicy::Parallel => docs.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < docs.len() {
        let head = docs[start].relevance;
        let end = start + docs[start..].iter().take_while(|d| head - d.relevance < epsilon).count();
        docs[start..end].sort_by(|l, r| r.rating.cmp(&l.rating));
        start = end;
    }
}

pub struct Ranker<'a> {
    index: &'a InvertedIndex,
    store: &'a DocumentStore,
    config: &'a SearchConfig,
}

impl<'a> Ranker<'a> {
    pub fn new(index: &'a InvertedIndex, store: &'a DocumentStore, config: &'a SearchConfig) -> Self {
        Self { index, store, config }
    }

    /// `ln(N / df)`; `None` when the word is not indexed.
    pub fn inverse_document_freq(&self, word: &str) -> Option<f64> {
        self.index.postings(word).map(|p| self.idf(p.len()))
    }

    fn idf(&self, document_freq: usize) -> f64 {
        (self.store.len() as f64 / document_freq as f64).ln()
    }

    /// Sorted, truncated hits for an already parsed query.
    pub fn find_top_documents<P>(&self, query: &Query<'_>, predicate: &P, policy: ExecutionPolicy) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let mut matched = self.find_all_documents(query, predicate, policy);
        sort_documents(&mut matched, self.config.relevance_epsilon, policy);
        let total = matched.len();
        matched.truncate(self.config.max_results);
        tracing::trace!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            total,
            %policy,
            "ranked query"
        );
        matched
    }

    /// Every qualifying document with its relevance, in id order.
    pub fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P, policy: ExecutionPolicy) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let relevance = match policy {
            ExecutionPolicy::Sequential => {
                let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
                for word in &query.plus_words {
                    self.accumulate_word(word, predicate, |id, r| *relevance.entry(id).or_insert(0.0) += r);
                }
                for word in &query.minus_words {
                    self.for_each_document(word, |id| {
                        relevance.remove(&id);
                    });
                }
                relevance
            }
            ExecutionPolicy::Parallel => {
                let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(self.config.bucket_count);
                let mut plus_words = query.plus_words.clone();
                plus_words.par_sort_unstable();
                plus_words.dedup();

                plus_words.par_iter().for_each(|word| {
                    self.accumulate_word(word, predicate, |id, r| *relevance.access(id) += r);
                });
                query.minus_words.par_iter().for_each(|word| {
                    self.for_each_document(word, |id| {
                        relevance.erase(id);
                    });
                });
                relevance.build_ordinary_map()
            }
        };

        relevance
            .into_iter()
            .filter_map(|(id, r)| self.store.get(id).map(|data| Document::new(id, r, data.rating)))
            .collect()
    }

    fn accumulate_word<P, F>(&self, word: &str, predicate: &P, mut add: F)
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool,
        F: FnMut(DocId, f64),
    {
        let Some(postings) = self.index.postings(word) else {
            return;
        };
        let idf = self.idf(postings.len());
        for (&id, &tf) in postings {
            let Some(data) = self.store.get(id) else {
                continue;
            };
            if predicate(id, data.status, data.rating) {
                add(id, tf * idf);
            }
        }
    }

    fn for_each_document<F: FnMut(DocId)>(&self, word: &str, mut f: F) {
        if let Some(postings) = self.index.postings(word) {
            postings.keys().for_each(|&id| f(id));
        }
    }
}
