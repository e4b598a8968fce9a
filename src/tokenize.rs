//! Tokenization capability and token counting.
//!
//! The core only needs an ordered stream of normalized word tokens. Real
//! deployments plug in a linguistic preprocessor (POS filtering,
//! lemmatization) behind [`Tokenizer`]; [`SimpleTokenizer`] is a plain
//! lowercase/alphabetic splitter with an optional stop-word list.

use std::collections::{HashMap, HashSet};

/// Produces normalized word tokens from raw text.
pub trait Tokenizer {
    /// Lazily tokenize `text`.
    fn tokenize<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a>;
}

/// Small English stop-word list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

/// Lowercasing tokenizer that splits on non-alphabetic characters.
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    min_len: usize,
    stopwords: HashSet<String>,
}

impl SimpleTokenizer {
    /// Tokenizer with no stop words and a minimum token length of 2.
    pub fn new() -> Self {
        Self {
            min_len: 2,
            stopwords: HashSet::new(),
        }
    }

    /// Tokenizer that drops common English function words.
    pub fn english() -> Self {
        Self::new().with_stopwords(ENGLISH_STOPWORDS.iter().copied())
    }

    /// Set the minimum token length (in characters).
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Add stop words. Matching is on the lowercased token.
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(
            text.split(|c: char| !c.is_alphabetic())
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase)
                .filter(move |t| t.chars().count() >= self.min_len)
                .filter(move |t| !self.stopwords.contains(t)),
        )
    }
}

/// Occurrence counts of distinct words, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenCounts {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl TokenCounts {
    /// Empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every token of a sequence.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = Self::new();
        for token in tokens {
            counts.add(token);
        }
        counts
    }

    /// Record one occurrence of `word`.
    pub fn add(&mut self, word: impl Into<String>) {
        self.add_n(word, 1);
    }

    /// Record `n` occurrences of `word`. `n == 0` is ignored so every stored
    /// count stays positive.
    pub fn add_n(&mut self, word: impl Into<String>, n: u64) {
        if n == 0 {
            return;
        }
        let word = word.into();
        match self.index.get(&word) {
            Some(&i) => self.entries[i].1 += n,
            None => {
                let _ = self.index.insert(word.clone(), self.entries.len());
                self.entries.push((word, n));
            }
        }
    }

    /// Count for `word`, if seen.
    pub fn get(&self, word: &str) -> Option<u64> {
        self.index.get(word).map(|&i| self.entries[i].1)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no word was counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of tokens counted.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// `(word, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

impl<S: Into<String>> FromIterator<S> for TokenCounts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}

impl<S: Into<String>> Extend<S> for TokenCounts {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.add(token);
        }
    }
}
