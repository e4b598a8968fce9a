//! Embedding capability: word → (vector, corpus frequency).
//!
//! The pipeline only ever reads from an embedding space, so implementations
//! must be `Send + Sync` and free of interior mutation on the read path.
//! A pretrained model is normally loaded once at startup and then shared by
//! every request through [`install_global`] / [`global`].

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::{Arc, OnceLock};

/// Read-only word embedding space.
pub trait EmbeddingSpace: Send + Sync {
    /// Whether `word` has a vector in this space.
    fn contains(&self, word: &str) -> bool;

    /// The vector for `word`.
    ///
    /// Fails with [`Error::Embedding`] if the word is absent.
    fn vector(&self, word: &str) -> Result<&[f32]>;

    /// Occurrence count of `word` in the model's training corpus.
    ///
    /// Fails with [`Error::Embedding`] if the word is absent.
    fn corpus_frequency(&self, word: &str) -> Result<u64>;
}

impl<T: EmbeddingSpace + ?Sized> EmbeddingSpace for &T {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }
    fn vector(&self, word: &str) -> Result<&[f32]> {
        (**self).vector(word)
    }
    fn corpus_frequency(&self, word: &str) -> Result<u64> {
        (**self).corpus_frequency(word)
    }
}

impl<T: EmbeddingSpace + ?Sized> EmbeddingSpace for Arc<T> {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }
    fn vector(&self, word: &str) -> Result<&[f32]> {
        (**self).vector(word)
    }
    fn corpus_frequency(&self, word: &str) -> Result<u64> {
        (**self).corpus_frequency(word)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    vector: Vec<f32>,
    count: u64,
}

/// Hash-map backed embedding space.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmbeddings {
    dim: Option<usize>,
    entries: HashMap<String, Entry>,
}

impl InMemoryEmbeddings {
    /// Create an empty space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word with its vector and corpus count.
    ///
    /// All vectors must share one dimension and counts must be positive.
    /// Re-inserting a word replaces its entry.
    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>, count: u64) -> Result<()> {
        let word = word.into();
        if count == 0 {
            return Err(Error::embedding(word, "corpus count must be positive"));
        }
        match self.dim {
            Some(dim) if dim != vector.len() => {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: vector.len(),
                })
            }
            None => self.dim = Some(vector.len()),
            _ => {}
        }
        let _ = self.entries.insert(word, Entry { vector, count });
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_word(mut self, word: impl Into<String>, vector: Vec<f32>, count: u64) -> Result<Self> {
        self.insert(word, vector, count)?;
        Ok(self)
    }

    /// Load a model in the word2vec text format.
    ///
    /// The first line is the `"<vocab_size> <dim>"` header; each following
    /// line is a word and its `dim` components. The format carries no corpus
    /// counts, and files are ordered most-frequent-first, so the count of the
    /// word at rank `r` (0-based) is synthesized as `vocab_size - r`.
    pub fn from_word2vec_text<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line.map_err(|e| Error::Other(e.to_string()))?,
            None => return Err(Error::Other("word2vec header is missing".into())),
        };
        let mut parts = header.split_whitespace();
        let (vocab_size, dim) = match (
            parts.next().and_then(|s| s.parse::<u64>().ok()),
            parts.next().and_then(|s| s.parse::<usize>().ok()),
        ) {
            (Some(v), Some(d)) => (v, d),
            _ => return Err(Error::Other(format!("malformed word2vec header '{header}'"))),
        };

        let mut space = Self::new();
        for (rank, line) in lines.enumerate() {
            let line = line.map_err(|e| Error::Other(e.to_string()))?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let vector = fields
                .map(|f| f.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| Error::embedding(word, e.to_string()))?;
            if vector.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: vector.len(),
                });
            }
            let count = vocab_size.saturating_sub(rank as u64).max(1);
            space.insert(word, vector, count)?;
        }
        Ok(space)
    }

    /// Vector dimension, once at least one word is present.
    pub fn dimension(&self) -> Option<usize> {
        self.dim
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no words are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, word: &str) -> Result<&Entry> {
        self.entries
            .get(word)
            .ok_or_else(|| Error::embedding(word, "word not in embedding space"))
    }
}

impl EmbeddingSpace for InMemoryEmbeddings {
    fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    fn vector(&self, word: &str) -> Result<&[f32]> {
        self.entry(word).map(|e| e.vector.as_slice())
    }

    fn corpus_frequency(&self, word: &str) -> Result<u64> {
        self.entry(word).map(|e| e.count)
    }
}

static GLOBAL: OnceLock<Box<dyn EmbeddingSpace>> = OnceLock::new();

/// Install the process-wide embedding space.
///
/// Only the first call succeeds; later calls return
/// [`Error::AlreadyInitialized`] and drop their argument.
pub fn install_global<E: EmbeddingSpace + 'static>(space: E) -> Result<()> {
    GLOBAL
        .set(Box::new(space))
        .map_err(|_| Error::AlreadyInitialized)?;
    tracing::info!("embedding space installed");
    Ok(())
}

/// The process-wide embedding space, or [`Error::NotReady`] before
/// [`install_global`] has run.
pub fn global() -> Result<&'static dyn EmbeddingSpace> {
    GLOBAL.get().map(|b| &**b).ok_or(Error::NotReady)
}

/// True once [`install_global`] has succeeded.
pub fn is_ready() -> bool {
    GLOBAL.get().is_some()
}
