use crate::error::{Result, SearchError};
use crate::execution::ExecutionPolicy;
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWord<'q> {
    pub data: &'q str,
    pub is_minus: bool,
    pub is_stop: bool,
}

/// Parsed query; words borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

pub struct QueryParser<'a> {
    stop_words: &'a StopWords,
}

impl<'a> QueryParser<'a> {
    pub fn new(stop_words: &'a StopWords) -> Self { Self { stop_words } }

    /// Classify one token: a single leading `-` marks a minus-word.
    pub fn parse_word<'q>(&self, token: &'q str) -> Result<QueryWord<'q>> {
        if token.is_empty() {
            return Err(SearchError::invalid("query word is empty"));
        }
        let (data, is_minus) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
            return Err(SearchError::invalid(format!("query word {token:?} is invalid")));
        }
        Ok(QueryWord { data, is_minus, is_stop: self.stop_words.contains(data) })
    }

    /// Split and classify a raw query, dropping stop words.
    ///
    /// The sequential policy sorts and deduplicates both word lists; ranking
    /// adds up per plus-word, so duplicates there would double-count. The
    /// parallel policy leaves them as written and the parallel ranker
    /// deduplicates on its own.
    pub fn parse<'q>(&self, text: &'q str, policy: ExecutionPolicy) -> Result<Query<'q>> {
        if !is_valid_word(text) {
            return Err(SearchError::invalid("query contains control characters"));
        }

        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = self.parse_word(token)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }

        if policy == ExecutionPolicy::Sequential {
            query.plus_words.sort_unstable();
            query.plus_words.dedup();
            query.minus_words.sort_unstable();
            query.minus_words.dedup();
        }

        let plus: BTreeSet<&str> = query.plus_words.iter().copied().collect();
        if let Some(word) = query.minus_words.iter().find(|w| plus.contains(*w)) {
            return Err(SearchError::invalid(format!(
                "word {word:?} is requested both as plus-word and minus-word"
            )));
        }
        Ok(query)
    }
}
