use std::io::Cursor;

use wordtree::embedding::{global, install_global};
use wordtree::{compute_tree_json, InMemoryEmbeddings, PipelineConfig, SimpleTokenizer};

// A toy word2vec model: two animal words, two vehicle words, one fruit.
const MODEL: &str = "\
6 3
car 0.05 0.98 0.10
dog 0.92 0.18 0.02
bus 0.10 0.95 0.05
cat 0.99 0.10 0.00
apple 0.10 0.05 0.99
train 0.02 0.90 0.20
";

const TEXT: &str = "The cat chased the dog around the car. \
    Later the dog and the cat slept while a bus and a train went by. \
    Someone ate an apple.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    install_global(InMemoryEmbeddings::from_word2vec_text(Cursor::new(MODEL))?)?;

    let config = PipelineConfig::new().with_n_neighbors(2);
    let json = compute_tree_json(TEXT, &SimpleTokenizer::english(), global()?, &config)?;
    println!("{json}");

    Ok(())
}
