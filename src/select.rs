//! Vocabulary selection: which words make it into the graph.
//!
//! Each word is scored by its in-document count relative to its baseline
//! corpus frequency, `score = count / corpus_frequency`. Words that are
//! common everywhere ("time", "make") score low; words the document uses far
//! more than usual score high.

use crate::embedding::EmbeddingSpace;
use crate::error::{Error, Result};
use crate::tokenize::TokenCounts;
use serde::{Deserialize, Serialize};

/// A word with its selection score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWord {
    /// The word.
    pub word: String,
    /// `count / corpus_frequency`.
    pub score: f64,
}

/// Rank the embeddable words of `counts` and keep the top `max_words`.
///
/// Words absent from `embeddings` are dropped. Order is descending by score;
/// equal scores keep the first-occurrence order of `counts`.
pub fn select_words<E>(counts: &TokenCounts, embeddings: &E, max_words: usize) -> Result<Vec<RankedWord>>
where
    E: EmbeddingSpace + ?Sized,
{
    let mut ranked = Vec::with_capacity(counts.len());
    for (word, count) in counts.iter() {
        if !embeddings.contains(word) {
            continue;
        }
        let frequency = embeddings.corpus_frequency(word)?;
        if frequency == 0 {
            return Err(Error::embedding(word, "corpus frequency is zero"));
        }
        ranked.push(RankedWord {
            word: word.to_string(),
            score: count as f64 / frequency as f64,
        });
    }

    // Stable: ties stay in insertion order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    tracing::debug!(
        distinct = counts.len(),
        eligible = ranked.len(),
        max_words,
        "ranked words"
    );
    ranked.truncate(max_words);
    Ok(ranked)
}
