use core::fmt;

/// Result alias for `wordtree`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the graph, clustering and tree stages.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Vector dimension mismatch between two embeddings.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Distance metric name is not recognised.
    UnknownMetric(String),

    /// The embedding capability failed for a word.
    Embedding {
        /// Word being looked up.
        word: String,
        /// Failure description.
        message: String,
    },

    /// The process-wide embedding space has not been installed yet.
    NotReady,

    /// The process-wide embedding space was already installed.
    AlreadyInitialized,

    /// Generic error with message.
    Other(String),
}

impl Error {
    /// Shorthand for an embedding failure on `word`.
    pub fn embedding(word: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Embedding {
            word: word.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's configuration rather than by
    /// the data or the embedding capability.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. } | Error::UnknownMetric(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::UnknownMetric(name) => write!(f, "unknown distance metric '{name}'"),
            Error::Embedding { word, message } => {
                write!(f, "embedding lookup failed for '{word}': {message}")
            }
            Error::NotReady => write!(f, "embedding space is not loaded yet"),
            Error::AlreadyInitialized => write!(f, "embedding space is already loaded"),
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
