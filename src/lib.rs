pub mod analyzer;
pub mod bayes;
pub mod clean;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod info;
pub mod lexicon;
pub mod normalize;
pub mod predict;
pub mod vectorize;

#[derive(Debug)]
pub enum SentiError {
    /// Empty, mismatched or malformed training/evaluation data.
    InvalidInput(String),
    /// Inference requested before a successful `train`.
    NotTrained,
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
}

impl std::fmt::Display for SentiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentiError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            SentiError::NotTrained => write!(f, "model not trained, call train first"),
            SentiError::Io(e) => write!(f, "io: {e}"),
            SentiError::Json(e) => write!(f, "json: {e}"),
            SentiError::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for SentiError {}

impl From<std::io::Error> for SentiError {
    fn from(e: std::io::Error) -> Self {
        SentiError::Io(e)
    }
}

impl From<serde_json::Error> for SentiError {
    fn from(e: serde_json::Error) -> Self {
        SentiError::Json(e)
    }
}
