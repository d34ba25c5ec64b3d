//! Document records and the append-only text log.
//!
//! Every ingested text is pushed once into `texts` and never moved or
//! rewritten. Entries are shared handles, so index views taken from them stay
//! valid independently of the document record's lifetime.

use crate::document::DocumentStatus;
use crate::error::{Result, SearchError};
use crate::tokenizer::is_valid_word;
use crate::{DocId, Rating};
use std::collections::btree_map::Keys;
use std::collections::BTreeMap;
use std::iter::Copied;
use std::sync::Arc;

/// Live document ids in ascending order.
pub type DocumentIds<'a> = Copied<Keys<'a, DocId, DocumentData>>;

#[derive(Debug, Clone)]
pub struct DocumentData {
    pub rating: Rating,
    pub status: DocumentStatus,
    text: Arc<str>,
}

impl DocumentData {
    pub fn text(&self) -> &Arc<str> { &self.text }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    texts: Vec<Arc<str>>,
    documents: BTreeMap<DocId, DocumentData>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Validate and record a new document, returning the stable handle to its text.
    pub fn insert(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[Rating],
    ) -> Result<Arc<str>> {
        if id < 0 {
            return Err(SearchError::invalid(format!("document id {id} is negative")));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::invalid(format!("document id {id} already exists")));
        }
        if !is_valid_word(text) {
            return Err(SearchError::invalid(format!(
                "text of document {id} contains control characters"
            )));
        }

        let text: Arc<str> = Arc::from(text);
        self.texts.push(Arc::clone(&text));
        self.documents.insert(
            id,
            DocumentData { rating: compute_average_rating(ratings), status, text: Arc::clone(&text) },
        );
        Ok(text)
    }

    pub fn get(&self, id: DocId) -> Option<&DocumentData> { self.documents.get(&id) }

    pub fn contains(&self, id: DocId) -> bool { self.documents.contains_key(&id) }

    /// Drops the record only; the text log keeps its entry.
    pub fn remove(&mut self, id: DocId) -> Option<DocumentData> { self.documents.remove(&id) }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn ids(&self) -> DocumentIds<'_> { self.documents.keys().copied() }

    /// Number of texts ever ingested, including those of removed documents.
    pub fn stored_text_count(&self) -> usize { self.texts.len() }
}

/// Integer mean truncated toward zero; `0` for no ratings.
pub fn compute_average_rating(ratings: &[Rating]) -> Rating {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as Rating
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rating_truncates_toward_zero() {
        assert_eq!(compute_average_rating(&[]), 0);
        assert_eq!(compute_average_rating(&[7, 2, 7]), 5);
        assert_eq!(compute_average_rating(&[5, -12, 2, 1]), -1);
        assert_eq!(compute_average_rating(&[-3, -4]), -3);
        assert_eq!(compute_average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn rejects_bad_ids_and_text() {
        let mut store = DocumentStore::new();
        assert!(store.insert(-1, "cat", DocumentStatus::Actual, &[]).unwrap_err().is_invalid_argument());
        store.insert(1, "cat", DocumentStatus::Actual, &[]).unwrap();
        assert!(store.insert(1, "dog", DocumentStatus::Actual, &[]).unwrap_err().is_invalid_argument());
        assert!(store.insert(2, "d\u{7}og", DocumentStatus::Actual, &[]).unwrap_err().is_invalid_argument());
        assert_eq!(store.len(), 1);
        assert_eq!(store.stored_text_count(), 1);
    }

    #[test]
    fn text_outlives_record() {
        let mut store = DocumentStore::new();
        let handle = store.insert(3, "fluffy cat", DocumentStatus::Banned, &[1]).unwrap();
        assert!(store.remove(3).is_some());
        assert!(!store.contains(3));
        assert_eq!(&*handle, "fluffy cat");
        assert_eq!(store.stored_text_count(), 1);
    }
}
