use crate::error::{Result, SearchError};
use std::collections::BTreeSet;

/// Iterator over the byte spans of whitespace-separated words.
pub struct WordSpans<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for WordSpans<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let start = self.pos + rest.find(|c: char| !c.is_whitespace())?;
        let end = self.text[start..]
            .find(char::is_whitespace)
            .map_or(self.text.len(), |off| start + off);
        self.pos = end;
        Some((start, end))
    }
}

/// Byte spans `(start, end)` of every word in `text`, split on runs of whitespace.
pub fn word_spans(text: &str) -> WordSpans<'_> {
    WordSpans { text, pos: 0 }
}

/// Lazily split `text` into words. Empty or blank input yields nothing.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> + '_ {
    word_spans(text).map(move |(s, e)| &text[s..e])
}

/// A word (or whole text) is valid when it holds no character below U+0020.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// Immutable stop-word set, fixed when the engine is built.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Collects distinct non-empty words; fails if any of them holds a control character.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::invalid(format!("stop word {word:?} is invalid")));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        if !is_valid_word(text) {
            return Err(SearchError::invalid("stop words text contains control characters"));
        }
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}
