//! End-to-end entry points: tokens in, tree records out.

use crate::community::{
    knn_graph_with_config, HierarchicalDetection, KnnGraphConfig, Louvain, SimilarityGraph,
};
use crate::config::PipelineConfig;
use crate::embedding::EmbeddingSpace;
use crate::error::{Error, Result};
use crate::hierarchy::{assemble_tree, Dendrogram, TreeNode};
use crate::select::{select_words, RankedWord};
use crate::tokenize::{TokenCounts, Tokenizer};

/// Every intermediate artifact of one pipeline run.
#[derive(Debug, Clone)]
pub struct WordTree {
    /// Selected words, best first. Index `i` is graph node `i`.
    pub words: Vec<RankedWord>,
    /// kNN similarity graph over `words`.
    pub graph: SimilarityGraph,
    /// Louvain levels, finest first.
    pub dendrogram: Dendrogram,
    /// Flattened tree, root last.
    pub nodes: Vec<TreeNode>,
}

/// Run the whole pipeline on precomputed token counts.
pub fn build_word_tree<E>(counts: &TokenCounts, embeddings: &E, config: &PipelineConfig) -> Result<WordTree>
where
    E: EmbeddingSpace + ?Sized,
{
    config.validate()?;

    let _span = tracing::info_span!(
        "word_tree",
        max_words = config.max_words,
        n_neighbors = config.n_neighbors,
        metric = %config.metric
    )
    .entered();

    let words = select_words(counts, embeddings, config.max_words)?;
    tracing::info!(distinct = counts.len(), selected = words.len(), "word selection");

    let graph = knn_graph_with_config(
        &words,
        embeddings,
        &KnnGraphConfig {
            k: config.n_neighbors,
            metric: config.metric,
        },
    )?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph construction"
    );

    let clusterer = Louvain::new()
        .with_resolution(config.resolution)
        .with_weight_fn(config.edge_weight);
    let dendrogram = clusterer.dendrogram(&graph)?;
    tracing::info!(levels = dendrogram.n_levels(), "clustering");

    let nodes = assemble_tree(&dendrogram, &graph)?;
    tracing::info!(tree_nodes = nodes.len(), "tree assembly");

    Ok(WordTree {
        words,
        graph,
        dendrogram,
        nodes,
    })
}

/// Build the word tree for a token sequence.
///
/// Configuration is validated before any embedding lookup. Tokens with no
/// embedding are ignored; if none survive, the result is the root alone.
pub fn compute_tree<I, S, E>(tokens: I, embeddings: &E, config: &PipelineConfig) -> Result<Vec<TreeNode>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    E: EmbeddingSpace + ?Sized,
{
    let counts = TokenCounts::from_tokens(tokens);
    Ok(build_word_tree(&counts, embeddings, config)?.nodes)
}

/// Tokenize `text` and build its word tree.
pub fn compute_tree_from_text<T, E>(
    text: &str,
    tokenizer: &T,
    embeddings: &E,
    config: &PipelineConfig,
) -> Result<Vec<TreeNode>>
where
    T: Tokenizer + ?Sized,
    E: EmbeddingSpace + ?Sized,
{
    compute_tree(tokenizer.tokenize(text), embeddings, config)
}

/// [`compute_tree_from_text`] serialized as a JSON array.
pub fn compute_tree_json<T, E>(
    text: &str,
    tokenizer: &T,
    embeddings: &E,
    config: &PipelineConfig,
) -> Result<String>
where
    T: Tokenizer + ?Sized,
    E: EmbeddingSpace + ?Sized,
{
    let nodes = compute_tree_from_text(text, tokenizer, embeddings, config)?;
    serde_json::to_string(&nodes).map_err(|e| Error::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::InMemoryEmbeddings;
    use crate::hierarchy::validate_tree;
    use crate::tokenize::SimpleTokenizer;

    fn space() -> InMemoryEmbeddings {
        let mut space = InMemoryEmbeddings::new();
        for (w, v) in [
            ("cat", [1.0, 0.1, 0.0]),
            ("dog", [0.9, 0.2, 0.0]),
            ("cow", [0.95, 0.0, 0.1]),
            ("car", [0.0, 1.0, 0.1]),
            ("bus", [0.1, 0.9, 0.0]),
            ("van", [0.0, 0.95, 0.2]),
        ] {
            space.insert(w, v.to_vec(), 100).unwrap();
        }
        space
    }

    #[test]
    fn test_invalid_config_rejected_first() {
        let config = PipelineConfig::new().with_n_neighbors(0);
        let err = compute_tree(["cat"], &space(), &config).unwrap_err();
        assert!(err.is_invalid_config());
    }

    /// Fails the test on any lookup.
    struct Untouchable;

    impl EmbeddingSpace for Untouchable {
        fn contains(&self, word: &str) -> bool {
            panic!("looked up {word}")
        }

        fn vector(&self, word: &str) -> Result<&[f32]> {
            panic!("looked up {word}")
        }

        fn corpus_frequency(&self, word: &str) -> Result<u64> {
            panic!("looked up {word}")
        }
    }

    #[test]
    fn test_invalid_config_never_queries_embeddings() {
        let config = PipelineConfig::new().with_resolution(0.0);
        let err = compute_tree(["cat", "dog"], &Untouchable, &config).unwrap_err();
        assert!(err.is_invalid_config());

        let counts = TokenCounts::from_tokens(["cat"]);
        let config = PipelineConfig::new().with_max_words(0);
        assert!(build_word_tree(&counts, &Untouchable, &config)
            .unwrap_err()
            .is_invalid_config());
    }

    #[test]
    fn test_empty_input_is_root_only() {
        let nodes = compute_tree(Vec::<String>::new(), &space(), &PipelineConfig::default()).unwrap();
        assert_eq!(nodes, vec![TreeNode::root(1)]);
    }

    #[test]
    fn test_unknown_words_only() {
        let nodes = compute_tree(["zzz", "qqq"], &space(), &PipelineConfig::default()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_root());
    }

    #[test]
    fn test_artifacts_line_up() {
        let counts = TokenCounts::from_tokens(["cat", "dog", "cow", "car", "bus", "van", "cat"]);
        let config = PipelineConfig::new().with_n_neighbors(2);
        let tree = build_word_tree(&counts, &space(), &config).unwrap();

        assert_eq!(tree.words.len(), 6);
        assert_eq!(tree.words[0].word, "cat");
        assert_eq!(tree.graph.node_count(), 6);
        assert_eq!(tree.dendrogram.n_items(), 6);
        assert_eq!(
            tree.dendrogram,
            Louvain::new().generate_dendrogram(&tree.graph).unwrap()
        );
        assert!(validate_tree(&tree.nodes).is_clean());
    }

    #[test]
    fn test_json_output() {
        let json = compute_tree_json(
            "The cat and the dog",
            &SimpleTokenizer::english(),
            &space(),
            &PipelineConfig::default(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.last().unwrap()["parentId"], serde_json::Value::Null);
        assert!(records.iter().any(|r| r["word"] == "cat"));
        assert!(records.iter().any(|r| r["word"] == "dog"));
    }
}
